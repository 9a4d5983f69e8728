//! # page_graph
//!
//! Page similarity graphs for recovering the reading order of shuffled books.
//!
//! A book is split into pages, every pair of pages is connected by an edge
//! weighted with their TF-IDF cosine similarity, and the node labels are
//! shuffled. The result is a supervised example: given only the graph, recover
//! the original page order.
//!
//! ## Features
//!
//! - **Pagination**: greedy word packing under an adaptive character budget
//! - **Windowing**: evenly overlapping fixed-size windows over long books
//! - **Graphs**: complete similarity graphs, k-NN sparsification, relabelling
//! - **Baseline**: greedy nearest-similarity ordering and four error metrics
//! - **Datasets**: seeded, parallel corpus assembly with JSON persistence
//!
//! ## Example
//!
//! ```
//! use page_graph::{generate_graph, naive_sequence, split_into_pages, ErrorMetrics};
//!
//! let text = "The rabbit ran into the garden. The rabbit ate a carrot. \
//!             The farmer saw the rabbit in his garden. The farmer chased it away.";
//! let pages = split_into_pages(text, 3).unwrap();
//! let graph = generate_graph(&pages).unwrap();
//! let order = naive_sequence(&graph, 0).unwrap();
//! let metrics = ErrorMetrics::compute(&order).unwrap();
//! assert!(metrics.l1 >= 0.0);
//! ```

pub mod dataset;
pub mod errors;
pub mod graph;
pub mod metrics;
pub mod nlp;
pub mod pager;
pub mod sequence;
pub mod similarity;
pub mod types;
pub mod windows;

// Re-export commonly used types
pub use errors::{PageGraphError, Result};
pub use types::{BookErrorPolicy, DatasetConfig, PosTag, Token, Window};

// Re-export main functionality
pub use dataset::{load_book, Book, Dataset, DatasetAssembler, DatasetEntry, SkippedBook};
pub use graph::{
    apply_permutation, generate_graph, graph_from_matrix, sparsify, validate_permutation,
    GraphBuilder, NodeAttributes, Permutation, Permuter, SimilarityGraph,
};
pub use metrics::{cosine_error, l1_error, l2_error, linf_error, ErrorMetrics};
pub use nlp::Tokenizer;
pub use pager::{clean_page, format_pages, split_into_pages, split_on_delimiter, split_text};
pub use sequence::{best_naive_sequence, naive_sequence, path_weight};
pub use similarity::{SimilarityMatrix, SimilarityOracle, TfidfOracle};
pub use windows::get_windows;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
