//! Graph substrate for subgraph-isomorphism candidate pruning.
//!
//! A [`GraphCore`] holds a node set and one adjacency matrix per channel and
//! derives the combined neighbor structure on demand. A [`CandidateOverlay`]
//! pairs a template `GraphCore` with the world nodes that may still match
//! each template node; pruning passes narrow its candidate matrix.

mod graph;
mod labels;
mod overlay;
mod summary;

pub use candgraph_common::{
    BitMatrix, GraphError, IdIndex, NodeIdx, NodeKey, Result, SparseMatrix, SummaryConfig,
};

pub use crate::graph::GraphCore;
pub use crate::labels::LabelMode;
pub use crate::overlay::CandidateOverlay;
pub use crate::summary::{Summary, SummaryRow};
