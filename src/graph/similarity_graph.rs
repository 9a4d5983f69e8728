//! Immutable page similarity graph
//!
//! Nodes are pages, edges carry the similarity between two pages. A graph is
//! never modified after construction: sparsification and permutation build new
//! values, so one graph can feed many concurrent trials without locking.

use crate::errors::{PageGraphError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Per-page node attributes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeAttributes {
    /// Position of the page in the graph's current ordering
    pub index: usize,
    /// Number of characters on the page
    pub char_count: usize,
    /// Number of whitespace-delimited words on the page
    pub word_count: usize,
    /// Sum of all incident edge weights at build time (0.0 when disabled)
    pub weight_sum: f64,
}

impl NodeAttributes {
    /// Attributes of a page at position `index`
    pub fn from_page(index: usize, page: &str) -> Self {
        Self {
            index,
            char_count: page.chars().count(),
            word_count: page.split_whitespace().count(),
            weight_sum: 0.0,
        }
    }

    /// `[index, char_count, word_count, weight_sum]`
    pub fn feature_vector(&self) -> [f64; 4] {
        [
            self.index as f64,
            self.char_count as f64,
            self.word_count as f64,
            self.weight_sum,
        ]
    }
}

/// A node with its adjacency map
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub attrs: NodeAttributes,
    /// Adjacency list: neighbour node ID -> edge weight
    pub edges: FxHashMap<usize, f64>,
}

/// Undirected, simple, edge-weighted graph over pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "GraphRecord", try_from = "GraphRecord")]
pub struct SimilarityGraph {
    nodes: Vec<GraphNode>,
}

impl SimilarityGraph {
    /// Assemble a graph from node attributes and undirected edges `(u, v, weight)`.
    ///
    /// Fails on self-loops, out-of-range endpoints, duplicate edges and weights
    /// that are not finite values in `[-1, 1]`.
    pub fn from_parts(
        attrs: Vec<NodeAttributes>,
        edges: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Result<Self> {
        let n = attrs.len();
        let mut nodes: Vec<GraphNode> = attrs
            .into_iter()
            .map(|attrs| GraphNode {
                attrs,
                edges: FxHashMap::default(),
            })
            .collect();

        for (u, v, weight) in edges {
            if u >= n || v >= n {
                return Err(PageGraphError::invalid_argument(format!(
                    "edge ({}, {}) references a node outside 0..{}",
                    u, v, n
                )));
            }
            if u == v {
                return Err(PageGraphError::invalid_argument(format!(
                    "self-loop on node {}",
                    u
                )));
            }
            if !weight.is_finite() || !(-1.0..=1.0).contains(&weight) {
                return Err(PageGraphError::invalid_argument(format!(
                    "edge ({}, {}) has weight {} outside [-1, 1]",
                    u, v, weight
                )));
            }
            if nodes[u].edges.insert(v, weight).is_some() {
                return Err(PageGraphError::invalid_argument(format!(
                    "duplicate edge ({}, {})",
                    u, v
                )));
            }
            nodes[v].edges.insert(u, weight);
        }

        Ok(Self { nodes })
    }

    /// Get the number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the total number of edges (counting each undirected edge once)
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.edges.len()).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_node(&self, node: usize) -> bool {
        node < self.nodes.len()
    }

    /// Attributes of a node
    pub fn node(&self, node: usize) -> Option<&NodeAttributes> {
        self.nodes.get(node).map(|n| &n.attrs)
    }

    /// Attributes of every node, in node order
    pub fn node_attributes(&self) -> impl Iterator<Item = &NodeAttributes> {
        self.nodes.iter().map(|n| &n.attrs)
    }

    /// Weight of the edge between `u` and `v`, if present
    pub fn weight(&self, u: usize, v: usize) -> Option<f64> {
        self.nodes.get(u).and_then(|n| n.edges.get(&v).copied())
    }

    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.weight(u, v).is_some()
    }

    pub fn degree(&self, node: usize) -> usize {
        self.nodes.get(node).map_or(0, |n| n.edges.len())
    }

    /// Neighbours of `node` with edge weights, sorted by neighbour index
    pub fn neighbors(&self, node: usize) -> Vec<(usize, f64)> {
        let mut neighbors: Vec<(usize, f64)> = self
            .nodes
            .get(node)
            .map(|n| n.edges.iter().map(|(&v, &w)| (v, w)).collect())
            .unwrap_or_default();
        neighbors.sort_unstable_by_key(|&(v, _)| v);
        neighbors
    }

    /// Every undirected edge once as `(u, v, weight)` with `u < v`, sorted
    pub fn edges(&self) -> Vec<(usize, usize, f64)> {
        let mut edges: Vec<(usize, usize, f64)> = self
            .nodes
            .iter()
            .enumerate()
            .flat_map(|(u, n)| {
                n.edges
                    .iter()
                    .filter(move |&(&v, _)| u < v)
                    .map(move |(&v, &w)| (u, v, w))
            })
            .collect();
        edges.sort_unstable_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        edges
    }

    /// Every edge in both directions, the layout message-passing frameworks expect
    pub fn directed_edges(&self) -> Vec<(usize, usize, f64)> {
        self.edges()
            .into_iter()
            .flat_map(|(u, v, w)| [(u, v, w), (v, u, w)])
            .collect()
    }

    /// All edge weights, sorted ascending (a multiset view)
    pub fn sorted_weights(&self) -> Vec<f64> {
        let mut weights: Vec<f64> = self.edges().into_iter().map(|(_, _, w)| w).collect();
        weights.sort_unstable_by(|a, b| a.total_cmp(b));
        weights
    }

    /// Whether every pair of distinct nodes is connected
    pub fn is_complete(&self) -> bool {
        let n = self.nodes.len();
        self.nodes.iter().all(|node| node.edges.len() + 1 == n)
    }

    /// Node feature rows, `[index, char_count, word_count, weight_sum]`
    pub fn feature_matrix(&self) -> Vec<[f64; 4]> {
        self.nodes.iter().map(|n| n.attrs.feature_vector()).collect()
    }

    /// Wrap nodes whose adjacency maps are already symmetric and loop-free
    pub(crate) fn from_nodes(nodes: Vec<GraphNode>) -> Self {
        Self { nodes }
    }

    pub(crate) fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }
}

// ============================================================================
// Serialized form
// ============================================================================

/// Flat, order-stable representation used for persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GraphRecord {
    nodes: Vec<NodeAttributes>,
    edges: Vec<(usize, usize, f64)>,
}

impl From<SimilarityGraph> for GraphRecord {
    fn from(graph: SimilarityGraph) -> Self {
        let edges = graph.edges();
        Self {
            nodes: graph.nodes.into_iter().map(|n| n.attrs).collect(),
            edges,
        }
    }
}

impl TryFrom<GraphRecord> for SimilarityGraph {
    type Error = PageGraphError;

    fn try_from(record: GraphRecord) -> Result<Self> {
        SimilarityGraph::from_parts(record.nodes, record.edges)
    }
}
