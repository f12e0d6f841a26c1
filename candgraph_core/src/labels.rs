//! Per-node labels handed to graph renderers.

use candgraph_common::NodeKey;

use crate::overlay::CandidateOverlay;

/// What to print on each node when a template is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LabelMode {
    /// Number of remaining candidates.
    #[default]
    CandidateCount,
    /// The node identifier.
    Identifier,
}

impl<N: NodeKey, C: NodeKey> CandidateOverlay<N, C> {
    /// One label per template node, in node order.
    #[must_use]
    pub fn node_labels(&self, mode: LabelMode) -> Vec<String> {
        match mode {
            LabelMode::CandidateCount => self
                .candidate_counts()
                .iter()
                .map(ToString::to_string)
                .collect(),
            LabelMode::Identifier => self.nodes().iter().map(|n| format!("{n:?}")).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use candgraph_common::{BitMatrix, SparseMatrix};

    use super::*;

    #[test]
    fn labels_follow_node_order() {
        let m = BitMatrix::from_rows(2, &[[true, true], [false, true]]).unwrap();
        let o: CandidateOverlay<&str, u8> =
            CandidateOverlay::new([7, 8], ["u", "v"], ["e"], [SparseMatrix::zeros((2, 2))], Some(m))
                .unwrap();
        assert_eq!(o.node_labels(LabelMode::CandidateCount), vec!["2", "1"]);
        assert_eq!(o.node_labels(LabelMode::Identifier), vec!["\"u\"", "\"v\""]);
    }
}
