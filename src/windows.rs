//! Overlapping fixed-size windows over a long page sequence
//!
//! A book longer than the graph size is carved into windows of exactly
//! `window_size` pages. The windows cover every page, and the unavoidable
//! overlap is spread as evenly as integer offsets allow.

use crate::errors::{PageGraphError, Result};
use crate::types::Window;
use log::trace;

/// Evenly spaced windows covering `0..num_pages`.
///
/// - `num_pages <= window_size`: a single window over everything.
/// - up to `2 * window_size`: one window anchored at each end.
/// - otherwise `ceil(num_pages / window_size)` windows share the surplus
///   `num_windows * window_size - num_pages` as overlap; the remainder that
///   does not divide evenly is absorbed by shifting the last windows left.
pub fn get_windows(num_pages: usize, window_size: usize) -> Result<Vec<Window>> {
    if window_size == 0 {
        return Err(PageGraphError::invalid_argument("window_size must be > 0"));
    }

    if num_pages <= window_size {
        return Ok(vec![Window::new(0, num_pages)]);
    }

    if num_pages <= 2 * window_size {
        return Ok(vec![
            Window::new(0, window_size),
            Window::new(num_pages - window_size, num_pages),
        ]);
    }

    let num_windows = num_pages.div_ceil(window_size);
    let surplus = num_windows * window_size - num_pages;
    let gaps = num_windows - 1;
    let overlap = surplus / gaps;
    let missing = surplus % gaps;

    trace!(
        "{} windows of {} over {} pages: overlap {}, {} shifted",
        num_windows,
        window_size,
        num_pages,
        overlap,
        missing
    );

    let windows = (0..num_windows)
        .map(|i| {
            let start = i * (window_size - overlap);
            let shift = if num_windows - i <= missing { missing } else { 0 };
            Window::new(start - shift, start - shift + window_size)
        })
        .collect();

    Ok(windows)
}
