//! Random node relabelling for supervised labels
//!
//! A permuted graph is a brand-new value: node `i` of the result carries the
//! attributes of original node `label[i]`, with its `index` attribute replaced
//! by `i`. The label vector is what a reordering model has to predict.

use super::similarity_graph::{GraphNode, SimilarityGraph};
use crate::errors::{PageGraphError, Result};
use log::trace;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

// ============================================================================
// Permutation
// ============================================================================

/// A bijection on `0..n`, stored as `label[new] = original`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Permutation(Vec<usize>);

impl Permutation {
    /// The identity permutation of length `n`
    pub fn identity(n: usize) -> Self {
        Self((0..n).collect())
    }

    /// Validate and wrap a label vector
    pub fn new(labels: Vec<usize>) -> Result<Self> {
        validate_permutation(&labels)?;
        Ok(Self(labels))
    }

    /// A uniformly random permutation of length `n`
    pub fn random<R: rand::Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        let mut labels: Vec<usize> = (0..n).collect();
        labels.shuffle(rng);
        Self(labels)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Original page index of the node labelled `new`
    pub fn original(&self, new: usize) -> Option<usize> {
        self.0.get(new).copied()
    }

    /// The label vector, `label[new] = original`
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// The opposite view, `inverse[original] = new`
    pub fn inverse(&self) -> Self {
        let mut inverse = vec![0; self.0.len()];
        for (new, &original) in self.0.iter().enumerate() {
            inverse[original] = new;
        }
        Self(inverse)
    }

    /// Map a node sequence of the permuted graph to original page indices
    pub fn to_original(&self, sequence: &[usize]) -> Result<Vec<usize>> {
        sequence
            .iter()
            .map(|&node| {
                self.original(node).ok_or_else(|| {
                    PageGraphError::invalid_argument(format!(
                        "node {} is outside a permutation of length {}",
                        node,
                        self.len()
                    ))
                })
            })
            .collect()
    }
}

impl TryFrom<Vec<usize>> for Permutation {
    type Error = PageGraphError;

    fn try_from(labels: Vec<usize>) -> Result<Self> {
        Self::new(labels)
    }
}

impl From<Permutation> for Vec<usize> {
    fn from(perm: Permutation) -> Self {
        perm.0
    }
}

/// Fail unless `values` is a permutation of `0..values.len()`
pub fn validate_permutation(values: &[usize]) -> Result<()> {
    let mut seen = vec![false; values.len()];
    for &value in values {
        match seen.get_mut(value) {
            Some(slot) if !*slot => *slot = true,
            Some(_) => {
                return Err(PageGraphError::invalid_argument(format!(
                    "{} appears more than once",
                    value
                )))
            }
            None => {
                return Err(PageGraphError::invalid_argument(format!(
                    "{} is outside 0..{}",
                    value,
                    values.len()
                )))
            }
        }
    }
    Ok(())
}

// ============================================================================
// Permuter
// ============================================================================

/// Draws random relabellings from a reproducible RNG
#[derive(Debug, Clone)]
pub struct Permuter {
    rng: ChaCha8Rng,
}

impl Permuter {
    /// A permuter whose draws are fully determined by `seed`
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// A permuter seeded from the thread RNG
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_rng(&mut rand::rng()),
        }
    }

    /// Relabel `graph` with a fresh random permutation
    pub fn permute(&mut self, graph: &SimilarityGraph) -> (SimilarityGraph, Permutation) {
        let perm = Permutation::random(graph.node_count(), &mut self.rng);
        trace!("Drew permutation {:?}", perm.as_slice());
        (relabel(graph, &perm), perm)
    }
}

/// Relabel `graph` so that new node `i` is original node `perm[i]`
pub fn apply_permutation(graph: &SimilarityGraph, perm: &Permutation) -> Result<SimilarityGraph> {
    if perm.len() != graph.node_count() {
        return Err(PageGraphError::invalid_argument(format!(
            "permutation of length {} does not fit a graph with {} nodes",
            perm.len(),
            graph.node_count()
        )));
    }
    Ok(relabel(graph, perm))
}

/// Caller guarantees `perm.len() == graph.node_count()`
fn relabel(graph: &SimilarityGraph, perm: &Permutation) -> SimilarityGraph {
    let new_label = perm.inverse();
    let nodes = graph.nodes();

    let relabelled = perm
        .as_slice()
        .iter()
        .enumerate()
        .map(|(new, &original)| {
            let source = &nodes[original];
            let mut attrs = source.attrs;
            attrs.index = new;
            GraphNode {
                attrs,
                edges: source
                    .edges
                    .iter()
                    .map(|(&other, &weight)| (new_label.0[other], weight))
                    .collect(),
            }
        })
        .collect();

    SimilarityGraph::from_nodes(relabelled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::similarity_graph::NodeAttributes;

    fn graph(n: usize) -> SimilarityGraph {
        let attrs = (0..n)
            .map(|i| NodeAttributes::from_page(i, &"w ".repeat(i + 1)))
            .collect();
        let edges: Vec<_> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j, (i * 10 + j) as f64 / 100.0)))
            .collect();
        SimilarityGraph::from_parts(attrs, edges).unwrap()
    }

    #[test]
    fn test_seeded_permuter_is_reproducible() {
        let g = graph(8);
        let (a, pa) = Permuter::from_seed(42).permute(&g);
        let (b, pb) = Permuter::from_seed(42).permute(&g);
        assert_eq!(pa, pb);
        assert_eq!(a, b);
    }

    #[test]
    fn test_label_is_a_bijection() {
        let g = graph(10);
        let mut permuter = Permuter::from_seed(7);
        for _ in 0..5 {
            let (_, perm) = permuter.permute(&g);
            assert!(validate_permutation(perm.as_slice()).is_ok());
            assert_eq!(perm.len(), 10);
        }
    }

    #[test]
    fn test_attributes_follow_their_node() {
        let g = graph(6);
        let (p, perm) = Permuter::from_seed(3).permute(&g);

        for new in 0..6 {
            let original = perm.original(new).unwrap();
            let moved = p.node(new).unwrap();
            let source = g.node(original).unwrap();
            assert_eq!(moved.index, new);
            assert_eq!(moved.word_count, source.word_count);
            assert_eq!(moved.char_count, source.char_count);
        }

        for u in 0..6 {
            for v in (u + 1)..6 {
                let original = g.weight(perm.original(u).unwrap(), perm.original(v).unwrap());
                assert_eq!(p.weight(u, v), original);
            }
        }
    }

    #[test]
    fn test_edge_multiset_preserved_and_source_untouched() {
        let g = graph(7);
        let before = g.clone();
        let (p, _) = Permuter::from_seed(11).permute(&g);
        assert_eq!(p.sorted_weights(), g.sorted_weights());
        assert_eq!(g, before);
    }

    #[test]
    fn test_apply_explicit_permutation() {
        let g = graph(3);
        let perm = Permutation::new(vec![2, 0, 1]).unwrap();
        let p = apply_permutation(&g, &perm).unwrap();

        // new 0 is old 2, new 1 is old 0
        assert_eq!(p.weight(0, 1), g.weight(2, 0));
        assert_eq!(p.node(0).unwrap().word_count, 3);
        assert_eq!(perm.inverse().as_slice(), &[1, 2, 0]);
        assert_eq!(perm.to_original(&[1, 2, 0]).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_apply_identity_is_noop() {
        let g = graph(5);
        assert_eq!(apply_permutation(&g, &Permutation::identity(5)).unwrap(), g);
    }

    #[test]
    fn test_invalid_permutations() {
        assert!(Permutation::new(vec![0, 0, 1]).is_err());
        assert!(Permutation::new(vec![0, 3, 1]).is_err());
        assert!(apply_permutation(&graph(3), &Permutation::identity(4)).is_err());
        assert!(serde_json::from_str::<Permutation>("[1, 1]").is_err());
        assert_eq!(
            serde_json::from_str::<Permutation>("[1, 0]").unwrap(),
            Permutation::new(vec![1, 0]).unwrap()
        );
    }
}
