//! Complete similarity graph construction
//!
//! The builder asks its oracle for the pairwise similarity matrix of a page
//! list, then wires every pair of pages with an edge carrying that similarity.

use super::similarity_graph::{NodeAttributes, SimilarityGraph};
use crate::errors::{PageGraphError, Result};
use crate::similarity::{SimilarityMatrix, SimilarityOracle, TfidfOracle};
use log::{debug, warn};
use rayon::prelude::*;

/// Builds complete, weighted page graphs from a similarity oracle
#[derive(Debug, Clone)]
pub struct GraphBuilder<O> {
    oracle: O,
    /// Store the incident weight sum on every node
    weight_sums: bool,
}

impl Default for GraphBuilder<TfidfOracle> {
    fn default() -> Self {
        Self::new(TfidfOracle::new())
    }
}

impl<O: SimilarityOracle> GraphBuilder<O> {
    /// Create a builder around an oracle, with weight sums enabled
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            weight_sums: true,
        }
    }

    /// Toggle the weight-sum node attribute
    pub fn with_weight_sums(mut self, enabled: bool) -> Self {
        self.weight_sums = enabled;
        self
    }

    /// The oracle used for similarity
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Build the complete graph of `pages`
    pub fn build(&self, pages: &[String]) -> Result<SimilarityGraph> {
        if pages.len() < 2 {
            return Err(PageGraphError::degenerate_input(format!(
                "a similarity graph needs at least 2 pages, got {}",
                pages.len()
            )));
        }

        let matrix = self.oracle.similarity(pages)?;
        graph_from_matrix(pages, &matrix, self.weight_sums)
    }

    /// Build one graph per page list, in parallel; results keep input order
    pub fn build_many(&self, page_lists: &[Vec<String>]) -> Vec<Result<SimilarityGraph>>
    where
        O: Sync,
    {
        page_lists.par_iter().map(|pages| self.build(pages)).collect()
    }
}

/// Build the complete graph of `pages` from an already computed matrix.
///
/// Asymmetric matrices are averaged with their transpose and values are
/// clamped to `[-1, 1]`, so both directions of an edge always agree.
pub fn graph_from_matrix(
    pages: &[String],
    matrix: &SimilarityMatrix,
    weight_sums: bool,
) -> Result<SimilarityGraph> {
    let n = pages.len();
    matrix.check(n)?;

    let matrix = if matrix.is_symmetric(1e-12) {
        matrix.clone()
    } else {
        warn!("similarity matrix for {} pages is asymmetric, averaging with its transpose", n);
        matrix.symmetrized()
    };

    let mut attrs: Vec<NodeAttributes> = pages
        .iter()
        .enumerate()
        .map(|(i, page)| NodeAttributes::from_page(i, page))
        .collect();

    let mut edges = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            let weight = matrix.get(i, j).clamp(-1.0, 1.0);
            if weight_sums {
                attrs[i].weight_sum += weight;
                attrs[j].weight_sum += weight;
            }
            edges.push((i, j, weight));
        }
    }

    debug!("Built complete graph: {} nodes, {} edges", n, edges.len());
    SimilarityGraph::from_parts(attrs, edges)
}

/// Build the complete graph of `pages` with the default TF-IDF oracle
pub fn generate_graph(pages: &[String]) -> Result<SimilarityGraph> {
    GraphBuilder::default().build(pages)
}
