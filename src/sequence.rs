//! Greedy reading-order reconstruction
//!
//! Starting from a root page, repeatedly step to the unvisited page most
//! similar to the page just visited. This approximates a maximum-weight
//! Hamiltonian path with no lookahead and no backtracking.

use crate::errors::{PageGraphError, Result};
use crate::graph::SimilarityGraph;
use log::debug;

/// Greedy nearest-similarity walk over every node, starting at `root`.
///
/// Ties go to the lowest node index. When the current node has no edge to any
/// unvisited node (possible after sparsification) the walk jumps to the lowest
/// unvisited index.
pub fn naive_sequence(graph: &SimilarityGraph, root: usize) -> Result<Vec<usize>> {
    let n = graph.node_count();
    if !graph.contains_node(root) {
        return Err(PageGraphError::invalid_argument(format!(
            "root {} is not a node of a graph with {} nodes",
            root, n
        )));
    }

    let mut visited = vec![false; n];
    let mut sequence = Vec::with_capacity(n);
    visited[root] = true;
    sequence.push(root);
    let mut current = root;

    while sequence.len() < n {
        let mut best: Option<(usize, f64)> = None;
        for (other, weight) in graph.neighbors(current) {
            if visited[other] {
                continue;
            }
            // neighbors() is sorted by index, so strict > keeps the lowest on ties
            if best.map_or(true, |(_, w)| weight > w) {
                best = Some((other, weight));
            }
        }

        let next = match best {
            Some((node, _)) => node,
            None => match visited.iter().position(|&v| !v) {
                Some(node) => node,
                None => break,
            },
        };

        visited[next] = true;
        sequence.push(next);
        current = next;
    }

    Ok(sequence)
}

/// Sum of edge weights between consecutive nodes; missing edges count as 0
pub fn path_weight(graph: &SimilarityGraph, sequence: &[usize]) -> f64 {
    sequence
        .windows(2)
        .map(|pair| graph.weight(pair[0], pair[1]).unwrap_or(0.0))
        .sum()
}

/// Run the greedy walk from every root and keep the heaviest path.
///
/// Ties go to the lowest root. Fails with `DegenerateInput` on an empty graph.
pub fn best_naive_sequence(graph: &SimilarityGraph) -> Result<Vec<usize>> {
    let mut best: Option<(Vec<usize>, f64)> = None;
    for root in 0..graph.node_count() {
        let sequence = naive_sequence(graph, root)?;
        let weight = path_weight(graph, &sequence);
        if best.as_ref().map_or(true, |(_, w)| weight > *w) {
            best = Some((sequence, weight));
        }
    }

    let (sequence, weight) =
        best.ok_or_else(|| PageGraphError::degenerate_input("graph has no nodes"))?;
    debug!("Best greedy path starts at {} (weight {:.4})", sequence[0], weight);
    Ok(sequence)
}
