//! Shared building blocks for the candgraph workspace.
//!
//! This crate provides the error taxonomy, the identifier index, and the
//! matrix types that graphs and candidate overlays are stored in.

pub mod bit_matrix;
mod config;
mod error;
pub mod id_index;
mod node_idx;
pub mod sparse;

pub use crate::bit_matrix::BitMatrix;
pub use crate::config::*;
pub use crate::error::*;
pub use crate::id_index::{IdIndex, NodeKey, validate_positions};
pub use crate::node_idx::{MAX_NODES, NodeIdx};
pub use crate::sparse::{Entry, SparseMatrix, Weight};
