//! TF-IDF cosine similarity oracle
//!
//! Each page is reduced to the lemmas of its content words, weighted by raw
//! term frequency times smoothed inverse document frequency
//! (`ln((1 + n) / (1 + df)) + 1`), and L2-normalized. The similarity of two
//! pages is the dot product of their normalized vectors, so weights fall in
//! `[0, 1]` and pages without content words are similar to nothing.

use super::{SimilarityMatrix, SimilarityOracle};
use crate::errors::{PageGraphError, Result};
use crate::nlp::tokenizer::Tokenizer;
use log::debug;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

/// Sparse document vector: `(term id, weight)` sorted by term id
type SparseVector = Vec<(u32, f64)>;

/// TF-IDF + cosine similarity over lemmatized content words
#[derive(Debug, Clone)]
pub struct TfidfOracle {
    tokenizer: Tokenizer,
}

impl Default for TfidfOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl TfidfOracle {
    /// Create an oracle ignoring single-character terms
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::new().with_min_length(2),
        }
    }

    /// Use a custom tokenizer
    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// L2-normalized TF-IDF vectors, one per page
    pub fn vectorize(&self, pages: &[String]) -> Result<Vec<SparseVector>> {
        let documents: Vec<Vec<String>> = pages
            .par_iter()
            .map(|page| self.tokenizer.content_lemmas(page))
            .collect();

        // Assign term ids in first-seen order so the result is deterministic
        let mut vocabulary: FxHashMap<&str, u32> = FxHashMap::default();
        let mut counts: Vec<FxHashMap<u32, f64>> = Vec::with_capacity(documents.len());
        for doc in &documents {
            let mut tf: FxHashMap<u32, f64> = FxHashMap::default();
            for lemma in doc {
                let next_id = vocabulary.len() as u32;
                let id = *vocabulary.entry(lemma.as_str()).or_insert(next_id);
                *tf.entry(id).or_insert(0.0) += 1.0;
            }
            counts.push(tf);
        }

        if vocabulary.is_empty() {
            return Err(PageGraphError::data_unavailable(
                "no content words found in any page",
            ));
        }

        let mut document_frequency = vec![0usize; vocabulary.len()];
        for tf in &counts {
            for &id in tf.keys() {
                document_frequency[id as usize] += 1;
            }
        }

        let n = pages.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        debug!(
            "TF-IDF vocabulary: {} terms over {} pages",
            vocabulary.len(),
            pages.len()
        );

        Ok(counts
            .into_iter()
            .map(|tf| {
                let mut vector: SparseVector = tf
                    .into_iter()
                    .map(|(id, count)| (id, count * idf[id as usize]))
                    .collect();
                vector.sort_unstable_by_key(|&(id, _)| id);
                let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for (_, w) in &mut vector {
                        *w /= norm;
                    }
                }
                vector
            })
            .collect())
    }
}

/// Dot product of two id-sorted sparse vectors
fn sparse_dot(a: &SparseVector, b: &SparseVector) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut sum = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}

impl SimilarityOracle for TfidfOracle {
    fn similarity(&self, pages: &[String]) -> Result<SimilarityMatrix> {
        let vectors = self.vectorize(pages)?;
        let size = vectors.len();

        let mut matrix = SimilarityMatrix::zeros(size);
        for i in 0..size {
            for j in i..size {
                let value = sparse_dot(&vectors[i], &vectors[j]).clamp(-1.0, 1.0);
                matrix.set(i, j, value);
                matrix.set(j, i, value);
            }
        }
        Ok(matrix)
    }
}
