//! Splitting running text into pages under a character budget
//!
//! Words are packed greedily into pages of at most `budget` characters. When
//! that produces too many pages the budget grows by roughly one percent of the
//! overflowing text and packing starts over.

use crate::errors::{PageGraphError, Result};
use log::{debug, trace};

/// Upper bound on budget corrections before giving up
pub const MAX_BUDGET_ITERATIONS: usize = 1_000;

/// Delimiter between pages in the on-disk book format
pub const PAGE_DELIMITER: &str = "\n\n";

/// Split `text` into at most `num_pages` pages.
///
/// Pages never split a word and, joined with single spaces, reproduce the
/// whitespace-normalized input. Fewer pages than requested are returned when
/// the text is short. Fails with `InvalidArgument` for `num_pages == 0`.
pub fn split_into_pages(text: &str, num_pages: usize) -> Result<Vec<String>> {
    split_with_limit(text, num_pages, MAX_BUDGET_ITERATIONS)
}

/// Pagination with at most `max_iterations` budget corrections
fn split_with_limit(text: &str, num_pages: usize, max_iterations: usize) -> Result<Vec<String>> {
    if num_pages == 0 {
        return Err(PageGraphError::invalid_argument(
            "the number of pages has to be a positive integer, not 0",
        ));
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    let mut budget = text.chars().count() / num_pages + 1;
    let mut pages = split_text(&words, budget);

    let mut iterations = 0;
    while pages.len() > num_pages {
        iterations += 1;
        if iterations > max_iterations {
            return Err(PageGraphError::degenerate_input(format!(
                "page budget did not converge to {} pages after {} corrections",
                num_pages, max_iterations
            )));
        }

        let overflow = pages.len() - num_pages;
        let excess = pages[pages.len() - overflow..].join(" ").chars().count();
        budget += excess / 100 + 1;
        trace!(
            "{} pages for a target of {}, raising budget to {}",
            pages.len(),
            num_pages,
            budget
        );
        pages = split_text(&words, budget);
    }

    debug!(
        "Split {} words into {} pages (budget {} chars, {} corrections)",
        words.len(),
        pages.len(),
        budget,
        iterations
    );
    Ok(pages)
}

/// Pack words greedily into pages of at most `budget` characters.
///
/// A word longer than the budget gets a page of its own.
pub fn split_text(words: &[&str], budget: usize) -> Vec<String> {
    let mut pages = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in words {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + word_len + 1 <= budget {
            current.push(' ');
            current.push_str(word);
            current_len += word_len + 1;
        } else {
            pages.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        pages.push(current);
    }
    pages
}

/// Trim a page and collapse every whitespace run to a single space
pub fn clean_page(page: &str) -> String {
    page.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Serialize pages in the book format: each cleaned page followed by a blank line
pub fn format_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let mut out = String::new();
    for page in pages {
        out.push_str(&clean_page(page.as_ref()));
        out.push_str(PAGE_DELIMITER);
    }
    out
}

/// Split a book on `delimiter`, dropping pages that are empty or blank
pub fn split_on_delimiter(text: &str, delimiter: &str) -> Vec<String> {
    text.split(delimiter)
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .map(str::to_string)
        .collect()
}
