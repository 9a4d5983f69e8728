//! Training corpus assembly
//!
//! Every book contributes one re-paginated whole-book graph plus, when its
//! natural page count exceeds the target, one graph per window over its
//! natural pages. Each graph is then permuted `num_perms` times, and every
//! permutation becomes a `(graph, label)` entry.
//!
//! Graph construction is independent per book and runs on the rayon pool.
//! Permutations are drawn afterwards, sequentially and in book order, from a
//! single seeded RNG, so a fixed seed reproduces the corpus exactly.

use crate::errors::{PageGraphError, Result};
use crate::graph::{GraphBuilder, Permutation, Permuter, SimilarityGraph};
use crate::pager::{split_into_pages, split_on_delimiter};
use crate::similarity::SimilarityOracle;
use crate::types::{BookErrorPolicy, DatasetConfig, Window};
use crate::windows::get_windows;
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

// ============================================================================
// Books
// ============================================================================

/// A source book: a name and its full text
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub name: String,
    pub text: String,
}

impl Book {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Read a UTF-8 book file; the book is named after the file stem
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            PageGraphError::data_unavailable(format!("cannot read {}: {}", path.display(), err))
        })?;
        if text.trim().is_empty() {
            return Err(PageGraphError::data_unavailable(format!(
                "{} contains no text",
                path.display()
            )));
        }
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, text })
    }
}

/// Read a book file, see [`Book::load`]
pub fn load_book(path: impl AsRef<Path>) -> Result<Book> {
    Book::load(path)
}

// ============================================================================
// Dataset
// ============================================================================

/// One training example
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EntryRecord")]
pub struct DatasetEntry {
    /// Name of the source book
    pub book: String,
    /// Window over the natural pages, `None` for the re-paginated whole book
    pub window: Option<Window>,
    /// The permuted graph
    pub graph: SimilarityGraph,
    /// `label[node] = original page position`
    pub label: Permutation,
}

impl DatasetEntry {
    /// Fails unless `label` relabels exactly the nodes of `graph`
    pub fn new(
        book: impl Into<String>,
        window: Option<Window>,
        graph: SimilarityGraph,
        label: Permutation,
    ) -> Result<Self> {
        if label.len() != graph.node_count() {
            return Err(PageGraphError::invalid_argument(format!(
                "label of length {} does not fit a graph with {} nodes",
                label.len(),
                graph.node_count()
            )));
        }
        Ok(Self {
            book: book.into(),
            window,
            graph,
            label,
        })
    }
}

/// Unchecked entry as read from disk
#[derive(Deserialize)]
struct EntryRecord {
    book: String,
    window: Option<Window>,
    graph: SimilarityGraph,
    label: Permutation,
}

impl TryFrom<EntryRecord> for DatasetEntry {
    type Error = PageGraphError;

    fn try_from(record: EntryRecord) -> Result<Self> {
        DatasetEntry::new(record.book, record.window, record.graph, record.label)
    }
}

/// A book left out of the corpus and why
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedBook {
    pub book: String,
    pub reason: String,
}

/// An ordered corpus of `(graph, label)` entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    entries: Vec<DatasetEntry>,
    #[serde(default)]
    skipped: Vec<SkippedBook>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at position `i`
    pub fn get(&self, i: usize) -> Option<&DatasetEntry> {
        self.entries.get(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DatasetEntry> {
        self.entries.iter()
    }

    /// Label vectors in entry order
    pub fn labels(&self) -> Vec<&[usize]> {
        self.entries.iter().map(|e| e.label.as_slice()).collect()
    }

    /// Books that failed under the skip policy
    pub fn skipped(&self) -> &[SkippedBook] {
        &self.skipped
    }

    /// Write the corpus as JSON
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Read a corpus written by [`Dataset::save_json`]
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| {
            PageGraphError::data_unavailable(format!("cannot open {}: {}", path.display(), err))
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

// ============================================================================
// Assembler
// ============================================================================

/// Graphs of one book, tagged with the window they cover
type BookGraphs = Vec<(Option<Window>, SimilarityGraph)>;

/// Builds permuted, labelled graphs from books
#[derive(Debug)]
pub struct DatasetAssembler<O> {
    config: DatasetConfig,
    builder: GraphBuilder<O>,
    permuter: Permuter,
}

impl<O: SimilarityOracle + Sync> DatasetAssembler<O> {
    /// Create an assembler; fails if `config` does not validate
    pub fn new(oracle: O, config: DatasetConfig) -> Result<Self> {
        config.validate()?;
        let permuter = match config.seed {
            Some(seed) => Permuter::from_seed(seed),
            None => Permuter::from_entropy(),
        };
        let builder = GraphBuilder::new(oracle).with_weight_sums(config.weight_sums);
        Ok(Self {
            config,
            builder,
            permuter,
        })
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// Page lists of every graph a book contributes, in order
    pub fn book_page_lists(&self, book: &Book) -> Result<Vec<(Option<Window>, Vec<String>)>> {
        if book.text.trim().is_empty() {
            return Err(PageGraphError::data_unavailable(format!(
                "book '{}' contains no text",
                book.name
            )));
        }

        let mut lists = vec![(None, split_into_pages(&book.text, self.config.num_pages)?)];

        let natural = split_on_delimiter(&book.text, &self.config.page_delimiter);
        if natural.len() > self.config.num_pages {
            for window in get_windows(natural.len(), self.config.window_size)? {
                lists.push((Some(window), window.slice(&natural).to_vec()));
            }
        }

        debug!(
            "Book '{}': {} natural pages, {} graphs",
            book.name,
            natural.len(),
            lists.len()
        );
        Ok(lists)
    }

    /// Build every graph a book contributes; the first failure fails the book
    pub fn book_graphs(&self, book: &Book) -> Result<BookGraphs> {
        let lists = self.book_page_lists(book)?;
        let pages: Vec<Vec<String>> = lists.iter().map(|(_, pages)| pages.clone()).collect();

        lists
            .into_iter()
            .zip(self.builder.build_many(&pages))
            .map(|((window, _), graph)| graph.map(|graph| (window, graph)))
            .collect()
    }

    /// Add one book to `dataset`, returning the number of entries added.
    ///
    /// Nothing is added unless every graph of the book builds.
    pub fn add_book(&mut self, dataset: &mut Dataset, book: &Book) -> Result<usize> {
        let graphs = self.book_graphs(book)?;
        Ok(self.commit(dataset, &book.name, graphs))
    }

    /// Assemble a corpus from `books`, honouring the configured failure policy
    pub fn assemble(&mut self, books: &[Book]) -> Result<Dataset> {
        info!("Assembling dataset from {} books", books.len());

        let built: Vec<Result<BookGraphs>> = {
            let this = &*self;
            books.par_iter().map(|book| this.book_graphs(book)).collect()
        };

        let mut dataset = Dataset::new();
        for (book, graphs) in books.iter().zip(built) {
            match graphs {
                Ok(graphs) => {
                    let added = self.commit(&mut dataset, &book.name, graphs);
                    info!("Book '{}': {} entries", book.name, added);
                }
                Err(err) => match self.config.on_book_error {
                    BookErrorPolicy::Abort => return Err(err),
                    BookErrorPolicy::Skip => {
                        warn!("Skipping book '{}': {}", book.name, err);
                        dataset.skipped.push(SkippedBook {
                            book: book.name.clone(),
                            reason: err.to_string(),
                        });
                    }
                },
            }
        }

        info!(
            "Dataset ready: {} entries, {} books skipped",
            dataset.len(),
            dataset.skipped.len()
        );
        Ok(dataset)
    }

    fn commit(&mut self, dataset: &mut Dataset, book: &str, graphs: BookGraphs) -> usize {
        let before = dataset.entries.len();
        for (window, graph) in graphs {
            for _ in 0..self.config.num_perms {
                let (permuted, label) = self.permuter.permute(&graph);
                dataset.entries.push(DatasetEntry {
                    book: book.to_string(),
                    window,
                    graph: permuted,
                    label,
                });
            }
        }
        dataset.entries.len() - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::SimilarityMatrix;

    fn banded(pages: &[String]) -> Result<SimilarityMatrix> {
        Ok(SimilarityMatrix::from_fn(pages.len(), |i, j| {
            1.0 / (1.0 + i.abs_diff(j) as f64)
        }))
    }

    fn book_with_pages(name: &str, n: usize) -> Book {
        let pages: Vec<String> = (0..n)
            .map(|i| format!("page {} words here and there", i))
            .collect();
        Book::new(name, pages.join("\n\n"))
    }

    fn config() -> DatasetConfig {
        DatasetConfig::new()
            .with_num_pages(4)
            .with_window_size(4)
            .with_num_perms(3)
            .with_seed(9)
    }

    #[test]
    fn test_short_book_gives_one_graph() {
        let assembler = DatasetAssembler::new(banded, config()).unwrap();
        let lists = assembler.book_page_lists(&book_with_pages("short", 3)).unwrap();
        assert_eq!(lists.len(), 1);
        assert!(lists[0].0.is_none());
        assert!(lists[0].1.len() <= 4);
    }

    #[test]
    fn test_long_book_adds_windows() {
        let assembler = DatasetAssembler::new(banded, config()).unwrap();
        let lists = assembler.book_page_lists(&book_with_pages("long", 10)).unwrap();
        // whole book + 3 windows of 4 over 10 pages
        assert_eq!(lists.len(), 4);
        let windows: Vec<Window> = lists.iter().filter_map(|(w, _)| *w).collect();
        assert_eq!(
            windows,
            vec![Window::new(0, 4), Window::new(3, 7), Window::new(6, 10)]
        );
        assert!(lists[1..].iter().all(|(_, pages)| pages.len() == 4));
        assert_eq!(lists[2].1[0], "page 3 words here and there");
    }

    #[test]
    fn test_entries_per_graph() {
        let mut assembler = DatasetAssembler::new(banded, config()).unwrap();
        let dataset = assembler
            .assemble(&[book_with_pages("a", 4), book_with_pages("b", 10)])
            .unwrap();
        // a: 1 graph, b: 4 graphs, 3 permutations each
        assert_eq!(dataset.len(), 15);
        assert_eq!(dataset.get(0).unwrap().book, "a");
        assert_eq!(dataset.get(3).unwrap().book, "b");
        for entry in dataset.iter() {
            assert_eq!(entry.label.len(), entry.graph.node_count());
        }
    }

    #[test]
    fn test_seed_reproduces_dataset() {
        let books = [book_with_pages("a", 6), book_with_pages("b", 9)];
        let first = DatasetAssembler::new(banded, config())
            .unwrap()
            .assemble(&books)
            .unwrap();
        let second = DatasetAssembler::new(banded, config())
            .unwrap()
            .assemble(&books)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_skip_policy_keeps_other_books() {
        let books = [
            book_with_pages("good", 4),
            Book::new("empty", "   "),
            book_with_pages("also-good", 4),
        ];
        let mut assembler = DatasetAssembler::new(banded, config()).unwrap();
        let dataset = assembler.assemble(&books).unwrap();

        assert_eq!(dataset.len(), 6);
        assert_eq!(dataset.skipped().len(), 1);
        assert_eq!(dataset.skipped()[0].book, "empty");
        assert!(dataset.iter().all(|e| e.book != "empty"));
    }

    #[test]
    fn test_abort_policy_fails_run() {
        let books = [book_with_pages("good", 4), Book::new("tiny", "word")];
        let config = config().with_on_book_error(BookErrorPolicy::Abort);
        let mut assembler = DatasetAssembler::new(banded, config).unwrap();
        assert!(matches!(
            assembler.assemble(&books),
            Err(PageGraphError::DegenerateInput { .. })
        ));
    }

    #[test]
    fn test_failed_add_book_leaves_dataset_intact() {
        let mut assembler = DatasetAssembler::new(banded, config()).unwrap();
        let mut dataset = Dataset::new();
        assert_eq!(
            assembler
                .add_book(&mut dataset, &book_with_pages("a", 4))
                .unwrap(),
            3
        );
        let snapshot = dataset.clone();

        assert!(assembler
            .add_book(&mut dataset, &Book::new("tiny", "word"))
            .is_err());
        assert_eq!(dataset, snapshot);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = config().with_num_perms(0);
        assert!(DatasetAssembler::new(banded, config).is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut assembler = DatasetAssembler::new(banded, config()).unwrap();
        let dataset = assembler.assemble(&[book_with_pages("a", 5)]).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.json");
        dataset.save_json(&path).unwrap();
        let loaded = Dataset::load_json(&path).unwrap();

        assert_eq!(loaded.len(), dataset.len());
        assert_eq!(loaded.labels(), dataset.labels());
        assert_eq!(loaded.get(0).unwrap().graph, dataset.get(0).unwrap().graph);
    }

    #[test]
    fn test_load_rejects_mismatched_label() {
        let mut assembler = DatasetAssembler::new(banded, config()).unwrap();
        let dataset = assembler.assemble(&[book_with_pages("a", 4)]).unwrap();
        let n = dataset.get(0).unwrap().graph.node_count();

        let mut value = serde_json::to_value(&dataset).unwrap();
        value["entries"][0]["label"] = serde_json::json!((0..n + 1).collect::<Vec<_>>());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.json");
        std::fs::write(&path, value.to_string()).unwrap();
        assert!(matches!(
            Dataset::load_json(&path),
            Err(PageGraphError::Serialization { .. })
        ));
    }

    #[test]
    fn test_load_rejects_out_of_range_weight() {
        let mut assembler = DatasetAssembler::new(banded, config()).unwrap();
        let dataset = assembler.assemble(&[book_with_pages("a", 4)]).unwrap();

        let mut value = serde_json::to_value(&dataset).unwrap();
        value["entries"][0]["graph"]["edges"][0][2] = serde_json::json!(-42.0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.json");
        std::fs::write(&path, value.to_string()).unwrap();
        assert!(Dataset::load_json(&path).is_err());
    }

    #[test]
    fn test_entry_requires_matching_label() {
        let graph = DatasetAssembler::new(banded, config())
            .unwrap()
            .builder
            .build(&["one page".to_string(), "two page".to_string()])
            .unwrap();
        assert!(DatasetEntry::new("b", None, graph.clone(), Permutation::identity(3)).is_err());
        assert!(DatasetEntry::new("b", None, graph, Permutation::identity(2)).is_ok());
    }

    #[test]
    fn test_book_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Animal Farm.txt");
        std::fs::write(&path, "first page\n\nsecond page\n\n").unwrap();

        let book = Book::load(&path).unwrap();
        assert_eq!(book.name, "Animal Farm");
        assert_eq!(load_book(&path).unwrap(), book);

        let empty = dir.path().join("empty.txt");
        std::fs::write(&empty, "\n\n").unwrap();
        assert!(matches!(
            Book::load(&empty),
            Err(PageGraphError::DataUnavailable { .. })
        ));
        assert!(Book::load(dir.path().join("missing.txt")).is_err());
    }
}
