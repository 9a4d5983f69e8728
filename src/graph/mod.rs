//! Page similarity graphs and the transformations derived from them.

pub mod builder;
pub mod permute;
pub mod similarity_graph;
pub mod sparsify;

pub use builder::{generate_graph, graph_from_matrix, GraphBuilder};
pub use permute::{apply_permutation, validate_permutation, Permutation, Permuter};
pub use similarity_graph::{GraphNode, NodeAttributes, SimilarityGraph};
pub use sparsify::sparsify;
