//! k-nearest-neighbour sparsification
//!
//! Every node nominates its `k` strongest edges; an edge survives when either
//! endpoint nominated it. Node degrees can therefore exceed `k`.

use super::similarity_graph::SimilarityGraph;
use crate::errors::{PageGraphError, Result};
use log::debug;
use rustc_hash::FxHashSet;
use std::cmp::Ordering;

/// Keep only the k-nearest-neighbour edges of `graph`.
///
/// Neighbours are ranked by weight descending; equal weights go to the lower
/// node index. Weights and node attributes are copied unchanged and the input
/// graph is left untouched.
pub fn sparsify(graph: &SimilarityGraph, k: usize) -> Result<SimilarityGraph> {
    let n = graph.node_count();
    if k >= n.max(1) {
        return Err(PageGraphError::invalid_argument(format!(
            "k must be in 0..{} for a graph with {} nodes, got {}",
            n.max(1),
            n,
            k
        )));
    }

    let mut kept: FxHashSet<(usize, usize)> = FxHashSet::default();
    for node in 0..n {
        let mut ranked = graph.neighbors(node);
        ranked.sort_by(|a, b| by_weight_then_index(*a, *b));
        for &(other, _) in ranked.iter().take(k) {
            kept.insert((node.min(other), node.max(other)));
        }
    }

    let mut edges: Vec<(usize, usize, f64)> = kept
        .into_iter()
        .filter_map(|(u, v)| graph.weight(u, v).map(|w| (u, v, w)))
        .collect();
    edges.sort_unstable_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

    debug!(
        "Sparsified to k={}: {} -> {} edges",
        k,
        graph.edge_count(),
        edges.len()
    );

    SimilarityGraph::from_parts(graph.node_attributes().copied().collect(), edges)
}

/// Heaviest first; ties resolved by ascending neighbour index
fn by_weight_then_index(a: (usize, f64), b: (usize, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then(a.0.cmp(&b.0))
}
