//! Multi-channel graphs with lazily derived neighbor structure.

use std::sync::{Arc, OnceLock};

use candgraph_common::{
    GraphError, IdIndex, NodeIdx, NodeKey, Result, SparseMatrix, validate_positions,
};
use indexmap::IndexMap;
use indexmap::map::Entry as MapEntry;
use tracing::{debug, trace};

/// A fixed node set with one square adjacency matrix per named channel.
///
/// Adjacency is never edited in place. The derived views below are computed
/// on first access and cached for the lifetime of the value; producing a
/// variant goes through [`GraphCore::copy`], [`GraphCore::with_channel`], or
/// [`GraphCore::into_channels`], each of which starts with empty caches.
///
/// A `GraphCore` used on its own plays the "world" role; one wrapped in a
/// [`crate::CandidateOverlay`] plays the "template" role.
#[derive(Debug)]
pub struct GraphCore<N: NodeKey> {
    nodes: Arc<IdIndex<N>>,
    channels: IndexMap<String, SparseMatrix>,

    // Derived views, filled at most once.
    composite: OnceLock<SparseMatrix>,
    symmetric: OnceLock<SparseMatrix>,
    is_neighbor: OnceLock<SparseMatrix<bool>>,
    neighbor_pairs: OnceLock<Vec<(NodeIdx, NodeIdx)>>,
}

impl<N: NodeKey> GraphCore<N> {
    /// Builds a graph from its nodes and one adjacency matrix per channel.
    ///
    /// Fails with [`GraphError::ShapeMismatch`] when the channel and matrix
    /// counts differ, a matrix is not `n_nodes x n_nodes`, or there are more
    /// than [`candgraph_common::MAX_NODES`] nodes, and with
    /// [`GraphError::DuplicateIdentifier`] on a repeated node or channel.
    pub fn new<S: Into<String>>(
        nodes: impl IntoIterator<Item = N>,
        channels: impl IntoIterator<Item = S>,
        adjacency: impl IntoIterator<Item = SparseMatrix>,
    ) -> Result<Self> {
        let nodes = Arc::new(IdIndex::try_from_iter(nodes)?);
        NodeIdx::ensure_addressable(nodes.len())?;
        let channels: Vec<String> = channels.into_iter().map(Into::into).collect();
        let adjacency: Vec<SparseMatrix> = adjacency.into_iter().collect();

        if channels.len() != adjacency.len() {
            return Err(GraphError::shape(
                "channel count vs adjacency matrix count",
                channels.len(),
                adjacency.len(),
            ));
        }

        let graph = Self::assemble(nodes, channels.into_iter().zip(adjacency))?;
        debug!(
            "built graph with {} nodes across {} channels",
            graph.n_nodes(),
            graph.n_channels()
        );
        Ok(graph)
    }

    /// Shape-checks every matrix against the node count and rejects repeated
    /// channel names.
    fn assemble(
        nodes: Arc<IdIndex<N>>,
        channels: impl IntoIterator<Item = (String, SparseMatrix)>,
    ) -> Result<Self> {
        let n = nodes.len();
        let mut by_name: IndexMap<String, SparseMatrix> = IndexMap::new();
        for (name, matrix) in channels {
            if matrix.shape() != (n, n) {
                return Err(GraphError::matrix_shape(
                    format!("adjacency for channel '{name}'"),
                    (n, n),
                    matrix.shape(),
                ));
            }
            match by_name.entry(name) {
                MapEntry::Occupied(entry) => {
                    return Err(GraphError::duplicate_id(entry.key()));
                }
                MapEntry::Vacant(entry) => {
                    entry.insert(matrix);
                }
            }
        }
        Ok(Self::from_validated(nodes, by_name))
    }

    #[contracts::debug_requires(channels.values().all(|m| m.shape() == (nodes.len(), nodes.len())))]
    fn from_validated(nodes: Arc<IdIndex<N>>, channels: IndexMap<String, SparseMatrix>) -> Self {
        Self {
            nodes,
            channels,
            composite: OnceLock::new(),
            symmetric: OnceLock::new(),
            is_neighbor: OnceLock::new(),
            neighbor_pairs: OnceLock::new(),
        }
    }

    // --- Nodes ---

    /// The ordered node identifiers.
    #[must_use]
    pub fn nodes(&self) -> &IdIndex<N> {
        &self.nodes
    }

    #[cfg(test)]
    pub(crate) const fn shared_nodes(&self) -> &Arc<IdIndex<N>> {
        &self.nodes
    }

    /// Number of nodes.
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Position of `node`, failing with [`GraphError::UnknownNode`].
    pub fn node_index(&self, node: &N) -> Result<NodeIdx> {
        self.nodes.require(node)
    }

    /// Identifier at `idx`, if in range.
    pub fn node_at(&self, idx: NodeIdx) -> Option<&N> {
        self.nodes.get(idx.as_usize())
    }

    // --- Channels ---

    /// Channel names in construction order.
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    /// Number of channels.
    #[must_use]
    pub fn n_channels(&self) -> usize {
        self.channels.len()
    }

    /// Adjacency matrix of `channel`, failing with
    /// [`GraphError::UnknownChannel`].
    pub fn adjacency(&self, channel: &str) -> Result<&SparseMatrix> {
        self.channels
            .get(channel)
            .ok_or_else(|| GraphError::unknown_channel(channel))
    }

    /// `(channel, matrix)` pairs in channel order.
    pub fn adjacencies(&self) -> impl Iterator<Item = (&str, &SparseMatrix)> {
        self.channels.iter().map(|(k, v)| (k.as_str(), v))
    }

    // --- Derived views ---

    /// Entrywise sum of every channel's adjacency.
    pub fn composite_adjacency(&self) -> &SparseMatrix {
        self.composite.get_or_init(|| {
            trace!("computing composite adjacency over {} channels", self.n_channels());
            let n = self.n_nodes();
            self.channels
                .values()
                .fold(SparseMatrix::zeros((n, n)), |acc, m| &acc + m)
        })
    }

    /// Composite adjacency plus its transpose.
    pub fn symmetric_adjacency(&self) -> &SparseMatrix {
        self.symmetric.get_or_init(|| {
            trace!("computing symmetric adjacency");
            let composite = self.composite_adjacency();
            composite + &composite.transpose()
        })
    }

    /// True wherever two nodes share an edge in either direction on any
    /// channel. Always symmetric.
    pub fn is_neighbor(&self) -> &SparseMatrix<bool> {
        self.is_neighbor.get_or_init(|| {
            trace!("computing neighbor relation");
            self.symmetric_adjacency().gt(0)
        })
    }

    /// Every undirected neighbor relation exactly once, as `(i, j)` with
    /// `i > j`, ordered by `i` then `j`.
    pub fn neighbor_pairs(&self) -> &[(NodeIdx, NodeIdx)] {
        self.neighbor_pairs.get_or_init(|| {
            let pairs: Vec<(NodeIdx, NodeIdx)> = self
                .is_neighbor()
                .strict_lower_triangle()
                .iter()
                .map(|(i, j, _)| (NodeIdx::from_position(i), NodeIdx::from_position(j)))
                .collect();
            trace!("found {} neighbor pairs", pairs.len());
            pairs
        })
    }

    /// Neighbors of `idx` in ascending position order. Empty when out of
    /// range.
    pub fn neighbors_of(&self, idx: NodeIdx) -> impl Iterator<Item = NodeIdx> + '_ {
        self.is_neighbor()
            .row_indices(idx.as_usize())
            .iter()
            .map(|&j| NodeIdx::from_position(j))
    }

    /// Number of distinct neighbors of `idx`.
    #[must_use]
    pub fn degree(&self, idx: NodeIdx) -> usize {
        self.is_neighbor().row_indices(idx.as_usize()).len()
    }

    // --- Variants ---

    /// The subgraph on the nodes at `node_indices`, in that order, with every
    /// channel restricted to those rows and columns.
    ///
    /// Fails with [`GraphError::IndexOutOfRange`] or
    /// [`GraphError::DuplicateIndex`]. `self` is untouched.
    #[contracts::debug_ensures(!ret.as_ref().is_ok_and(|g| g.n_nodes() != node_indices.len()))]
    pub fn induce_subgraph(&self, node_indices: &[NodeIdx]) -> Result<Self> {
        let positions: Vec<usize> = node_indices.iter().map(|i| i.as_usize()).collect();
        validate_positions(&positions, self.n_nodes())?;

        let nodes = Arc::new(IdIndex::try_from_iter(self.nodes.select(&positions)?)?);
        let channels = self
            .channels
            .iter()
            .map(|(name, m)| m.select(&positions).map(|sub| (name.clone(), sub)))
            .collect::<Result<IndexMap<_, _>>>()?;

        debug!(
            "induced subgraph with {} of {} nodes",
            nodes.len(),
            self.n_nodes()
        );
        Ok(Self::from_validated(nodes, channels))
    }

    /// [`GraphCore::induce_subgraph`] addressed by identifier. Fails with
    /// [`GraphError::UnknownNode`] on an absent identifier.
    pub fn induce_by_ids(&self, node_ids: &[N]) -> Result<Self> {
        let indices = node_ids
            .iter()
            .map(|id| self.node_index(id))
            .collect::<Result<Vec<_>>>()?;
        self.induce_subgraph(&indices)
    }

    /// Same nodes and channels with independently owned adjacency matrices
    /// and empty caches. The node index is shared.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self::from_validated(Arc::clone(&self.nodes), self.channels.clone())
    }

    /// A copy with `channel` replaced by `matrix`, or appended when the
    /// channel is new. Fails with [`GraphError::ShapeMismatch`] when the
    /// matrix is not `n_nodes x n_nodes`.
    pub fn with_channel(&self, channel: impl Into<String>, matrix: SparseMatrix) -> Result<Self> {
        let channel = channel.into();
        let n = self.n_nodes();
        if matrix.shape() != (n, n) {
            return Err(GraphError::matrix_shape(
                format!("adjacency for channel '{channel}'"),
                (n, n),
                matrix.shape(),
            ));
        }
        let mut channels = self.channels.clone();
        channels.insert(channel, matrix);
        Ok(Self::from_validated(Arc::clone(&self.nodes), channels))
    }

    /// Consumes the graph, yielding its owned `(channel, matrix)` pairs.
    #[must_use]
    pub fn into_channels(self) -> Vec<(String, SparseMatrix)> {
        self.channels.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_abc() -> GraphCore<&'static str> {
        let e = SparseMatrix::from_edges(3, [(0, 1), (1, 2)]).unwrap();
        GraphCore::new(["a", "b", "c"], ["e"], [e]).unwrap()
    }

    #[test]
    fn caches_are_filled_once() {
        let g = path_abc();
        assert!(g.composite.get().is_none());
        let first: *const SparseMatrix = g.composite_adjacency();
        let second: *const SparseMatrix = g.composite_adjacency();
        assert_eq!(first, second);
        assert!(g.symmetric.get().is_none());
        let _ = g.neighbor_pairs();
        assert!(g.symmetric.get().is_some());
        assert!(g.is_neighbor.get().is_some());
    }

    #[test]
    fn copy_starts_with_empty_caches() {
        let g = path_abc();
        let _ = g.neighbor_pairs();
        let c = g.copy();
        assert!(c.composite.get().is_none());
        assert!(c.neighbor_pairs.get().is_none());
        assert!(Arc::ptr_eq(&g.nodes, &c.nodes));
    }

    #[test]
    fn duplicate_channel_rejected() {
        let e = SparseMatrix::zeros((1, 1));
        let err = GraphCore::new(["a"], ["e", "e"], [e.clone(), e]).unwrap_err();
        assert_eq!(err, GraphError::DuplicateIdentifier("\"e\"".into()));
    }

    #[test]
    fn unknown_lookups() {
        let g = path_abc();
        assert_eq!(g.node_index(&"z"), Err(GraphError::UnknownNode("\"z\"".into())));
        assert_eq!(g.adjacency("f"), Err(GraphError::UnknownChannel("f".into())));
        assert_eq!(g.node_at(NodeIdx::new(3)), None);
    }

    #[test]
    fn neighbors_and_degree() {
        let g = path_abc();
        let b = g.node_index(&"b").unwrap();
        assert_eq!(
            g.neighbors_of(b).collect::<Vec<_>>(),
            vec![NodeIdx::new(0), NodeIdx::new(2)]
        );
        assert_eq!(g.degree(b), 2);
        assert_eq!(g.degree(NodeIdx::new(9)), 0);
    }

    #[test]
    fn with_channel_replaces_in_place_order() {
        let g = path_abc();
        let f = SparseMatrix::from_edges(3, [(2, 0)]).unwrap();
        let g2 = g.with_channel("f", f.clone()).unwrap();
        assert_eq!(g2.channels().collect::<Vec<_>>(), vec!["e", "f"]);
        let g3 = g2.with_channel("e", f).unwrap();
        assert_eq!(g3.channels().collect::<Vec<_>>(), vec!["e", "f"]);
        assert_eq!(g3.composite_adjacency().get(2, 0), 2);
        assert!(g.with_channel("g", SparseMatrix::zeros((2, 2))).is_err());
    }
}
