//! Scoring a reconstructed page order against the true order
//!
//! A reconstruction is a permutation `seq` of `0..n`, compared with the
//! reference `0, 1, ..., n-1`. Three scores are distances (0 means the order is
//! perfect) and one, [`cosine_error`], is a similarity (1 means perfect).
//! Anything that combines them must go through [`ErrorMetrics::distances`],
//! which flips the cosine score into a distance.

use crate::errors::{PageGraphError, Result};
use crate::graph::validate_permutation;
use serde::{Deserialize, Serialize};

fn check(sequence: &[usize]) -> Result<()> {
    if sequence.is_empty() {
        return Err(PageGraphError::invalid_argument(
            "cannot score an empty sequence",
        ));
    }
    validate_permutation(sequence).map_err(|err| {
        PageGraphError::invalid_argument(format!("sequence is not a permutation: {}", err))
    })
}

fn displacements(sequence: &[usize]) -> impl Iterator<Item = f64> + '_ {
    sequence
        .iter()
        .enumerate()
        .map(|(i, &page)| page as f64 - i as f64)
}

/// Sum of absolute positional differences
pub fn l1_error(sequence: &[usize]) -> Result<f64> {
    check(sequence)?;
    Ok(displacements(sequence).map(f64::abs).sum())
}

/// Euclidean norm of positional differences
pub fn l2_error(sequence: &[usize]) -> Result<f64> {
    check(sequence)?;
    Ok(displacements(sequence).map(|d| d * d).sum::<f64>().sqrt())
}

/// Largest absolute positional difference
pub fn linf_error(sequence: &[usize]) -> Result<f64> {
    check(sequence)?;
    Ok(displacements(sequence).map(f64::abs).fold(0.0, f64::max))
}

/// Cosine similarity between the sequence and the reference order.
///
/// Higher is better. A one-page sequence scores 1.0.
pub fn cosine_error(sequence: &[usize]) -> Result<f64> {
    check(sequence)?;
    Ok(cosine_to_reference(sequence))
}

fn cosine_to_reference(sequence: &[usize]) -> f64 {
    let n = sequence.len();
    if n == 1 {
        return 1.0;
    }
    let dot: f64 = sequence
        .iter()
        .enumerate()
        .map(|(i, &page)| (i * page) as f64)
        .sum();
    // Both vectors hold 0..n, so they share the same norm
    let norm_sq: f64 = (0..n).map(|i| (i * i) as f64).sum();
    dot / norm_sq
}

/// All four scores of one reconstruction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorMetrics {
    /// Length of the scored sequence
    pub len: usize,
    pub l1: f64,
    pub l2: f64,
    pub linf: f64,
    /// Similarity, not a distance: 1.0 for the true order
    pub cosine: f64,
}

impl ErrorMetrics {
    /// Score `sequence` against `0..n`
    pub fn compute(sequence: &[usize]) -> Result<Self> {
        check(sequence)?;
        Ok(Self::scores(sequence))
    }

    /// Caller guarantees `sequence` is a non-empty permutation
    fn scores(sequence: &[usize]) -> Self {
        Self {
            len: sequence.len(),
            l1: displacements(sequence).map(f64::abs).sum(),
            l2: displacements(sequence).map(|d| d * d).sum::<f64>().sqrt(),
            linf: displacements(sequence).map(f64::abs).fold(0.0, f64::max),
            cosine: cosine_to_reference(sequence),
        }
    }

    /// The cosine score turned into a distance, `1 - cosine`
    pub fn cosine_distance(&self) -> f64 {
        1.0 - self.cosine
    }

    /// `[l1, l2, linf, 1 - cosine]`: every entry 0 for the true order
    pub fn distances(&self) -> [f64; 4] {
        [self.l1, self.l2, self.linf, self.cosine_distance()]
    }

    /// Distances divided by their worst case over permutations of the same length.
    ///
    /// The reversed order attains every maximum, so each entry lies in `[0, 1]`.
    /// Entries whose worst case is 0 (a single page) are reported as 0.
    pub fn normalized(&self) -> [f64; 4] {
        let reversed: Vec<usize> = (0..self.len).rev().collect();
        let worst = Self::scores(&reversed).distances();
        let mut out = self.distances();
        for (value, max) in out.iter_mut().zip(worst) {
            *value = if max > 0.0 { *value / max } else { 0.0 };
        }
        out
    }
}
