use std::fmt;

use crate::{GraphError, Result};

/// Largest node count a graph may hold. Positions are stored as `u32`.
pub const MAX_NODES: usize = u32::MAX as usize;

/// Row/column of a node in every adjacency matrix of its graph, and its row
/// in a candidate matrix.
///
/// Obtained from [`crate::IdIndex::require`], from [`NodeIdx::try_from`] for
/// caller-supplied positions, or from [`NodeIdx::from_position`] when the
/// position is already known to lie inside a graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(u32);

impl NodeIdx {
    /// Wraps a raw position.
    #[must_use]
    pub const fn new(position: u32) -> Self {
        Self(position)
    }

    /// Position taken from an existing graph, whose node count never exceeds
    /// [`MAX_NODES`].
    #[must_use]
    #[contracts::debug_requires(position < MAX_NODES)]
    pub fn from_position(position: usize) -> Self {
        Self(u32::try_from(position).unwrap_or(u32::MAX))
    }

    /// Fails with [`GraphError::ShapeMismatch`] when `count` nodes could not
    /// all be addressed.
    pub fn ensure_addressable(count: usize) -> Result<()> {
        if count > MAX_NODES {
            return Err(GraphError::shape(
                "node count",
                format!("at most {MAX_NODES}"),
                count,
            ));
        }
        Ok(())
    }

    /// Index into matrix rows and columns.
    #[must_use]
    #[contracts::debug_ensures(ret == self.0 as usize)]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<usize> for NodeIdx {
    type Error = GraphError;

    fn try_from(position: usize) -> Result<Self> {
        u32::try_from(position)
            .ok()
            .filter(|&p| p < u32::MAX)
            .map(Self)
            .ok_or_else(|| GraphError::out_of_range(position, MAX_NODES))
    }
}

impl From<NodeIdx> for usize {
    fn from(idx: NodeIdx) -> Self {
        idx.as_usize()
    }
}

impl fmt::Display for NodeIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}
