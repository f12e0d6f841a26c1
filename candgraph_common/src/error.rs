//! Error types for graph construction and queries.
//!
//! Every error here is a contract violation by the caller or the data it
//! supplied. They are detected at the offending call and never retried.

use thiserror::Error;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised while building or querying graphs and candidate overlays.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A count or dimension disagrees with what the structure requires.
    #[error("Shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Which value was being checked.
        context: String,
        /// The required shape or count.
        expected: String,
        /// The shape or count that was supplied.
        actual: String,
    },

    /// An identifier appeared more than once in a sequence that must be unique.
    #[error("Duplicate identifier: {0}")]
    DuplicateIdentifier(String),

    /// An identifier was looked up that is not part of the node set.
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    /// A candidate was looked up that is not part of the candidate set.
    #[error("Unknown candidate: {0}")]
    UnknownCandidate(String),

    /// A channel name was looked up that the graph does not carry.
    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    /// A position fell outside `[0, len)`.
    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The offending position.
        index: usize,
        /// The length of the indexed sequence.
        len: usize,
    },

    /// A position list contained the same index twice.
    #[error("Duplicate index: {0}")]
    DuplicateIndex(usize),
}

impl GraphError {
    /// Create a shape mismatch error.
    pub fn shape(
        context: impl Into<String>,
        expected: impl std::fmt::Display,
        actual: impl std::fmt::Display,
    ) -> Self {
        Self::ShapeMismatch {
            context: context.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a shape mismatch error for a two-dimensional shape.
    pub fn matrix_shape(
        context: impl Into<String>,
        expected: (usize, usize),
        actual: (usize, usize),
    ) -> Self {
        Self::shape(
            context,
            format!("{}x{}", expected.0, expected.1),
            format!("{}x{}", actual.0, actual.1),
        )
    }

    /// Create a duplicate identifier error from any debuggable id.
    pub fn duplicate_id(id: &impl std::fmt::Debug) -> Self {
        Self::DuplicateIdentifier(format!("{id:?}"))
    }

    /// Create an unknown node error from any debuggable id.
    pub fn unknown_node(id: &impl std::fmt::Debug) -> Self {
        Self::UnknownNode(format!("{id:?}"))
    }

    /// Create an unknown candidate error from any debuggable id.
    pub fn unknown_candidate(id: &impl std::fmt::Debug) -> Self {
        Self::UnknownCandidate(format!("{id:?}"))
    }

    /// Create an unknown channel error.
    pub fn unknown_channel(name: impl Into<String>) -> Self {
        Self::UnknownChannel(name.into())
    }

    /// Create an out-of-range error.
    pub const fn out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }
}
