//! Candidate bookkeeping for a template graph.

use std::sync::Arc;

use candgraph_common::{BitMatrix, GraphError, IdIndex, NodeIdx, NodeKey, Result, SparseMatrix};
use tracing::{debug, trace};

use crate::graph::GraphCore;
use crate::summary::Summary;

/// A template graph paired with the world nodes that may still match each of
/// its nodes.
///
/// `is_candidate()` has exactly one row per template node and one column per
/// candidate for the whole life of the overlay. Filters are expected to only
/// clear bits; that is their contract, not something checked here.
#[derive(Debug)]
pub struct CandidateOverlay<N: NodeKey, C: NodeKey = N> {
    graph: GraphCore<N>,
    candidates: Arc<IdIndex<C>>,
    is_candidate: BitMatrix,
}

impl<N: NodeKey, C: NodeKey> CandidateOverlay<N, C> {
    /// Builds the template graph and its candidate matrix.
    ///
    /// Without `is_candidate` every candidate starts viable for every node.
    /// A supplied matrix must be `(n_nodes, n_candidates)`.
    pub fn new<S: Into<String>>(
        candidates: impl IntoIterator<Item = C>,
        nodes: impl IntoIterator<Item = N>,
        channels: impl IntoIterator<Item = S>,
        adjacency: impl IntoIterator<Item = SparseMatrix>,
        is_candidate: Option<BitMatrix>,
    ) -> Result<Self> {
        let graph = GraphCore::new(nodes, channels, adjacency)?;
        Self::from_graph(graph, candidates, is_candidate)
    }

    /// Wraps an already built template graph.
    pub fn from_graph(
        graph: GraphCore<N>,
        candidates: impl IntoIterator<Item = C>,
        is_candidate: Option<BitMatrix>,
    ) -> Result<Self> {
        let candidates = Arc::new(IdIndex::try_from_iter(candidates)?);
        let expected = (graph.n_nodes(), candidates.len());
        let is_candidate = match is_candidate {
            Some(m) if m.shape() != expected => {
                return Err(GraphError::matrix_shape(
                    "candidate matrix",
                    expected,
                    m.shape(),
                ));
            }
            Some(m) => m,
            None => BitMatrix::ones(expected.0, expected.1),
        };
        debug!(
            "built candidate overlay: {} template nodes x {} candidates",
            expected.0, expected.1
        );
        Ok(Self {
            graph,
            candidates,
            is_candidate,
        })
    }

    // --- Accessors ---

    /// The template graph.
    #[must_use]
    pub const fn graph(&self) -> &GraphCore<N> {
        &self.graph
    }

    /// The template node identifiers.
    #[must_use]
    pub fn nodes(&self) -> &IdIndex<N> {
        self.graph.nodes()
    }

    /// The candidate identifiers.
    #[must_use]
    pub fn candidates(&self) -> &IdIndex<C> {
        &self.candidates
    }

    /// Number of candidates.
    #[must_use]
    pub fn n_candidates(&self) -> usize {
        self.candidates.len()
    }

    /// The candidate matrix: row per template node, column per candidate.
    #[must_use]
    pub const fn is_candidate(&self) -> &BitMatrix {
        &self.is_candidate
    }

    // --- Queries ---

    /// Current candidates of `node`, in candidate order.
    pub fn candidates_for(&self, node: &N) -> Result<Vec<&C>> {
        let idx = self.graph.node_index(node)?;
        Ok(self.candidates_at(idx))
    }

    /// Current candidates of the node at `idx`. Empty when out of range.
    #[must_use]
    pub fn candidates_at(&self, idx: NodeIdx) -> Vec<&C> {
        self.is_candidate
            .row_ones(idx.as_usize())
            .filter_map(|j| self.candidates.get(j))
            .collect()
    }

    fn candidate_position(&self, candidate: &C) -> Result<usize> {
        self.candidates
            .position(candidate)
            .ok_or_else(|| GraphError::unknown_candidate(candidate))
    }

    /// Whether `candidate` is still viable for `node`. Fails with
    /// [`GraphError::UnknownNode`] or [`GraphError::UnknownCandidate`].
    pub fn is_candidate_for(&self, node: &N, candidate: &C) -> Result<bool> {
        let row = self.graph.node_index(node)?.as_usize();
        let col = self.candidate_position(candidate)?;
        Ok(self.is_candidate.get(row, col))
    }

    /// Number of current candidates of every template node, in node order.
    #[must_use]
    pub fn candidate_counts(&self) -> Vec<usize> {
        self.is_candidate.row_counts()
    }

    /// Whether every template node is down to exactly one candidate.
    #[must_use]
    pub fn all_identified(&self) -> bool {
        self.candidate_counts().iter().all(|&n| n == 1)
    }

    /// Template nodes left without any candidate.
    #[must_use]
    pub fn infeasible_nodes(&self) -> Vec<&N> {
        self.candidate_counts()
            .iter()
            .enumerate()
            .filter(|&(_, &n)| n == 0)
            .filter_map(|(i, _)| self.graph.nodes().get(i))
            .collect()
    }

    /// Whether some template node has no candidate left.
    #[must_use]
    pub fn has_infeasible_node(&self) -> bool {
        (0..self.graph.n_nodes()).any(|i| self.is_candidate.row_count(i) == 0)
    }

    // --- Updates ---

    /// Writes a single entry of the candidate matrix by position.
    pub fn set_candidate(&mut self, node: NodeIdx, candidate: usize, viable: bool) -> Result<()> {
        self.is_candidate.set(node.as_usize(), candidate, viable)
    }

    /// Marks `candidate` as no longer viable for `node`. Returns whether it
    /// was viable before the call. Unknown identifiers fail as in
    /// [`CandidateOverlay::is_candidate_for`].
    pub fn remove_candidate(&mut self, node: &N, candidate: &C) -> Result<bool> {
        let row = self.graph.node_index(node)?.as_usize();
        let col = self.candidate_position(candidate)?;
        let was = self.is_candidate.get(row, col);
        self.is_candidate.set(row, col, false)?;
        trace!("removed candidate {:?} from {:?}", candidate, node);
        Ok(was)
    }

    /// Keeps only the candidates of `node` for which `keep` returns true.
    /// Returns how many were removed.
    pub fn retain_candidates(
        &mut self,
        node: NodeIdx,
        mut keep: impl FnMut(&C) -> bool,
    ) -> Result<usize> {
        let row = node.as_usize();
        if row >= self.graph.n_nodes() {
            return Err(GraphError::out_of_range(row, self.graph.n_nodes()));
        }
        let dropped: Vec<usize> = self
            .is_candidate
            .row_ones(row)
            .filter(|&j| self.candidates.get(j).is_some_and(|c| !keep(c)))
            .collect();
        for &j in &dropped {
            self.is_candidate.set(row, j, false)?;
        }
        Ok(dropped.len())
    }

    // --- Diagnostics ---

    /// Read-only report of the current candidate sets.
    #[must_use]
    pub fn summarize(&self) -> Summary<'_, N, C> {
        Summary::build(self, None)
    }

    // --- Variants ---

    /// Independent candidate matrix and adjacency; node and candidate
    /// identifiers are shared.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self {
            graph: self.graph.copy(),
            candidates: Arc::clone(&self.candidates),
            is_candidate: self.is_candidate.clone(),
        }
    }

    /// The overlay restricted to the template nodes at `node_indices`, with
    /// their candidate rows. The candidate set is unchanged.
    pub fn induce_subgraph(&self, node_indices: &[NodeIdx]) -> Result<Self> {
        let graph = self.graph.induce_subgraph(node_indices)?;
        let rows: Vec<usize> = node_indices.iter().map(|i| i.as_usize()).collect();
        let is_candidate = self.is_candidate.select_rows(&rows)?;
        Ok(Self {
            graph,
            candidates: Arc::clone(&self.candidates),
            is_candidate,
        })
    }

    /// Consumes the overlay, returning the template graph and the candidate
    /// matrix.
    #[must_use]
    pub fn into_parts(self) -> (GraphCore<N>, BitMatrix) {
        (self.graph, self.is_candidate)
    }

    #[cfg(test)]
    pub(crate) const fn shared_candidates(&self) -> &Arc<IdIndex<C>> {
        &self.candidates
    }
}

impl<N: NodeKey + PartialEq<C>, C: NodeKey> CandidateOverlay<N, C> {
    /// Template nodes whose own identifier is not among their candidates.
    ///
    /// Only meaningful when template and world identifiers share a namespace
    /// and a node's identifier names its true match.
    #[must_use]
    pub fn missing_ground_truth(&self) -> Vec<&N> {
        self.graph
            .nodes()
            .iter()
            .enumerate()
            .filter(|&(i, node)| {
                !self
                    .candidates_at(NodeIdx::from_position(i))
                    .iter()
                    .any(|c| node == *c)
            })
            .map(|(_, node)| node)
            .collect()
    }

    /// [`CandidateOverlay::summarize`] plus the ground-truth check from
    /// [`CandidateOverlay::missing_ground_truth`].
    #[must_use]
    pub fn summarize_with_ground_truth(&self) -> Summary<'_, N, C> {
        Summary::build(self, Some(self.missing_ground_truth()))
    }
}
