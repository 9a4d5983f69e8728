//! Pairwise page similarity.
//!
//! The graph builder never computes similarity itself; it asks a
//! [`SimilarityOracle`] for a dense `n × n` matrix. The crate ships a TF-IDF
//! cosine oracle ([`tfidf::TfidfOracle`]); any closure with the right shape is
//! an oracle too, which keeps tests and alternative backends cheap to plug in.

pub mod tfidf;

use crate::errors::{PageGraphError, Result};
use serde::{Deserialize, Serialize};

pub use tfidf::TfidfOracle;

// ============================================================================
// SimilarityMatrix
// ============================================================================

/// Dense square matrix of pairwise page similarities, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// An `n × n` matrix of zeros
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            values: vec![0.0; size * size],
        }
    }

    /// Build from nested rows; every row must have exactly `rows.len()` entries.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let size = rows.len();
        let mut values = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(PageGraphError::data_unavailable(format!(
                    "similarity matrix row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    size
                )));
            }
            values.extend(row);
        }
        Ok(Self { size, values })
    }

    /// Build by evaluating `f(i, j)` for every cell
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut values = Vec::with_capacity(size * size);
        for i in 0..size {
            for j in 0..size {
                values.push(f(i, j));
            }
        }
        Self { size, values }
    }

    /// Side length
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.values[i * self.size + j] = value;
    }

    /// Whether `m[i][j] == m[j][i]` for every pair, within `tolerance`
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        (0..self.size).all(|i| {
            ((i + 1)..self.size).all(|j| (self.get(i, j) - self.get(j, i)).abs() <= tolerance)
        })
    }

    /// Average each pair of mirrored entries
    pub fn symmetrized(&self) -> Self {
        Self::from_fn(self.size, |i, j| (self.get(i, j) + self.get(j, i)) / 2.0)
    }

    /// Reject matrices of the wrong shape or with NaN/infinite entries
    pub fn check(&self, expected_size: usize) -> Result<()> {
        if self.size != expected_size {
            return Err(PageGraphError::data_unavailable(format!(
                "similarity oracle returned a {0}x{0} matrix for {1} pages",
                self.size, expected_size
            )));
        }
        if let Some(pos) = self.values.iter().position(|v| !v.is_finite()) {
            return Err(PageGraphError::data_unavailable(format!(
                "similarity oracle returned a non-finite value at ({}, {})",
                pos / self.size,
                pos % self.size
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SimilarityOracle
// ============================================================================

/// Computes pairwise similarities between page texts.
///
/// # Contract
///
/// - **Input**: the page texts of one graph, in node order.
/// - **Output**: an `n × n` matrix with entries in `[-1, 1]`.
/// - **Deterministic**: identical input must produce an identical matrix;
///   otherwise seeded datasets stop being reproducible.
///
/// Implementations should be constructed once (loading any models or word
/// lists up front) and shared across books.
pub trait SimilarityOracle {
    /// Compute the similarity matrix for `pages`.
    fn similarity(&self, pages: &[String]) -> Result<SimilarityMatrix>;
}

impl<F> SimilarityOracle for F
where
    F: Fn(&[String]) -> Result<SimilarityMatrix>,
{
    fn similarity(&self, pages: &[String]) -> Result<SimilarityMatrix> {
        self(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows = vec![vec![1.0, 0.5], vec![0.5]];
        assert!(matches!(
            SimilarityMatrix::from_rows(rows),
            Err(PageGraphError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn test_symmetrized() {
        let m = SimilarityMatrix::from_rows(vec![vec![1.0, 0.2], vec![0.4, 1.0]]).unwrap();
        assert!(!m.is_symmetric(1e-12));

        let s = m.symmetrized();
        assert!(s.is_symmetric(1e-12));
        assert!((s.get(0, 1) - 0.3).abs() < 1e-12);
        assert!((s.get(1, 0) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_check_shape_and_finite() {
        let m = SimilarityMatrix::zeros(3);
        assert!(m.check(3).is_ok());
        assert!(m.check(4).is_err());

        let mut bad = SimilarityMatrix::zeros(2);
        bad.set(1, 0, f64::NAN);
        let err = bad.check(2).unwrap_err();
        assert!(err.to_string().contains("(1, 0)"));
    }

    #[test]
    fn test_closure_oracle() {
        let oracle = |pages: &[String]| -> Result<SimilarityMatrix> {
            Ok(SimilarityMatrix::from_fn(pages.len(), |_, _| 0.5))
        };
        let pages = vec!["a".to_string(), "b".to_string()];
        let m = oracle.similarity(&pages).unwrap();
        assert_eq!(m.size(), 2);
        assert_eq!(m.get(0, 1), 0.5);
    }
}
