//! Command line front end: paginate books, build datasets, score the greedy baseline.

use clap::{ArgAction, Parser, Subcommand};
use log::{info, warn};
use page_graph::{
    best_naive_sequence, format_pages, load_book, naive_sequence, sparsify, split_into_pages,
    BookErrorPolicy, DatasetAssembler, DatasetConfig, ErrorMetrics, GraphBuilder,
    PageGraphError, Permuter, Result, TfidfOracle, VERSION,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "page_graph", version = VERSION, about = "Page similarity graphs for shuffled books")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Re-paginate a book and write it in the blank-line page format
    Paginate {
        input: PathBuf,
        #[arg(long, default_value_t = 100)]
        pages: usize,
        /// Output file; stdout when omitted
        #[arg(short = 'o', long = "out")]
        out: Option<PathBuf>,
    },
    /// Assemble a permuted graph dataset from books and save it as JSON
    Dataset {
        #[arg(required = true)]
        books: Vec<PathBuf>,
        #[arg(short = 'o', long = "out")]
        out: PathBuf,
        /// JSON file with a dataset configuration; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        pages: Option<usize>,
        #[arg(long)]
        window: Option<usize>,
        #[arg(long)]
        perms: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long = "abort-on-error", action = ArgAction::SetTrue)]
        abort_on_error: bool,
    },
    /// Shuffle one book's graph and score the greedy reconstruction
    Sequence {
        book: PathBuf,
        #[arg(long, default_value_t = 100)]
        pages: usize,
        /// Keep only the k strongest neighbours per page
        #[arg(long)]
        k: Option<usize>,
        #[arg(long, default_value_t = 0, conflicts_with = "best")]
        root: usize,
        /// Try every root and keep the heaviest path
        #[arg(long, action = ArgAction::SetTrue)]
        best: bool,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli.command) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

/// Command line flags override the config file. Without a file, the window
/// size follows `--pages` unless `--window` is given.
fn resolve_config(
    file: Option<DatasetConfig>,
    pages: Option<usize>,
    window: Option<usize>,
    perms: Option<usize>,
    seed: Option<u64>,
    abort_on_error: bool,
) -> DatasetConfig {
    let from_file = file.is_some();
    let mut config = file.unwrap_or_default();
    if let Some(pages) = pages {
        config = config.with_num_pages(pages);
        if !from_file {
            config = config.with_window_size(pages);
        }
    }
    if let Some(window) = window {
        config = config.with_window_size(window);
    }
    if let Some(perms) = perms {
        config = config.with_num_perms(perms);
    }
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    if abort_on_error {
        config = config.with_on_book_error(BookErrorPolicy::Abort);
    }
    config
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Paginate { input, pages, out } => {
            let book = load_book(&input)?;
            let text = format_pages(&split_into_pages(&book.text, pages)?);
            match out {
                Some(path) => {
                    std::fs::write(&path, text)?;
                    info!("Wrote {} to {}", book.name, path.display());
                }
                None => print!("{}", text),
            }
            Ok(())
        }
        Command::Dataset {
            books,
            out,
            config,
            pages,
            window,
            perms,
            seed,
            abort_on_error,
        } => {
            let file_config = match config {
                Some(path) => Some(DatasetConfig::from_json(&std::fs::read_to_string(&path)?)?),
                None => None,
            };
            let config = resolve_config(file_config, pages, window, perms, seed, abort_on_error);

            let mut loaded = Vec::with_capacity(books.len());
            for path in &books {
                match load_book(path) {
                    Ok(book) => loaded.push(book),
                    Err(err) if !abort_on_error => warn!("Skipping {}: {}", path.display(), err),
                    Err(err) => return Err(err),
                }
            }

            let mut assembler = DatasetAssembler::new(TfidfOracle::new(), config)?;
            let dataset = assembler.assemble(&loaded)?;
            dataset.save_json(&out)?;
            println!(
                "{} entries from {} books ({} skipped) written to {}",
                dataset.len(),
                loaded.len() - dataset.skipped().len(),
                books.len() - loaded.len() + dataset.skipped().len(),
                out.display()
            );
            Ok(())
        }
        Command::Sequence {
            book,
            pages,
            k,
            root,
            best,
            seed,
        } => {
            let book = load_book(&book)?;
            let page_list = split_into_pages(&book.text, pages)?;
            let graph = GraphBuilder::default().build(&page_list)?;
            let graph = match k {
                Some(k) => sparsify(&graph, k)?,
                None => graph,
            };

            let mut permuter = match seed {
                Some(seed) => Permuter::from_seed(seed),
                None => Permuter::from_entropy(),
            };
            let (shuffled, label) = permuter.permute(&graph);
            if root >= shuffled.node_count() {
                return Err(PageGraphError::invalid_argument(format!(
                    "root {} out of range for {} pages",
                    root,
                    shuffled.node_count()
                )));
            }

            let order = if best {
                best_naive_sequence(&shuffled)?
            } else {
                naive_sequence(&shuffled, root)?
            };
            let recovered = label.to_original(&order)?;
            let metrics = ErrorMetrics::compute(&recovered)?;
            let normalized = metrics.normalized();

            println!("book:   {} ({} pages)", book.name, recovered.len());
            println!("l1:     {:.3} ({:.3})", metrics.l1, normalized[0]);
            println!("l2:     {:.3} ({:.3})", metrics.l2, normalized[1]);
            println!("linf:   {:.3} ({:.3})", metrics.linf, normalized[2]);
            println!("cosine: {:.3} ({:.3})", metrics.cosine, normalized[3]);
            Ok(())
        }
    }
}
