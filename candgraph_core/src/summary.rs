//! Textual diagnostics over a candidate overlay.

use std::fmt::{self, Debug};

use candgraph_common::{NodeIdx, NodeKey, SummaryConfig};
use itertools::Itertools;
use tracing::debug;

use crate::overlay::CandidateOverlay;

/// One template node and its current candidates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryRow<'a, N, C> {
    /// Position of the node in the template.
    pub index: NodeIdx,
    /// The template node.
    pub node: &'a N,
    /// Its current candidates, in candidate order.
    pub candidates: Vec<&'a C>,
}

/// Snapshot of an overlay's candidate sets.
///
/// `Display` renders the report: one line per node, most candidates first
/// (ties go to the later node), followed by the identified nodes and, when
/// requested, the nodes missing their ground-truth candidate.
#[derive(Clone, Debug)]
pub struct Summary<'a, N: NodeKey, C: NodeKey> {
    rows: Vec<SummaryRow<'a, N, C>>,
    identified: Vec<&'a N>,
    missing_ground_truth: Option<Vec<&'a N>>,
    config: SummaryConfig,
}

impl<'a, N: NodeKey, C: NodeKey> Summary<'a, N, C> {
    pub(crate) fn build(
        overlay: &'a CandidateOverlay<N, C>,
        missing_ground_truth: Option<Vec<&'a N>>,
    ) -> Self {
        let per_node: Vec<SummaryRow<'a, N, C>> = overlay
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, node)| SummaryRow {
                index: NodeIdx::from_position(i),
                node,
                candidates: overlay.candidates_at(NodeIdx::from_position(i)),
            })
            .collect();

        let identified: Vec<&'a N> = per_node
            .iter()
            .filter(|row| row.candidates.len() == 1)
            .map(|row| row.node)
            .collect();

        let rows: Vec<SummaryRow<'a, N, C>> = per_node
            .into_iter()
            .sorted_by(|a, b| {
                b.candidates
                    .len()
                    .cmp(&a.candidates.len())
                    .then(b.index.cmp(&a.index))
            })
            .collect();

        debug!(
            "summary: {} of {} template nodes identified",
            identified.len(),
            rows.len()
        );

        Self {
            rows,
            identified,
            missing_ground_truth,
            config: SummaryConfig::default(),
        }
    }

    /// Use `config` when rendering candidate lists.
    #[must_use]
    pub const fn with_config(mut self, config: SummaryConfig) -> Self {
        self.config = config;
        self
    }

    /// Per-node rows in report order.
    #[must_use]
    pub fn rows(&self) -> &[SummaryRow<'a, N, C>] {
        &self.rows
    }

    /// Template nodes with exactly one candidate, in template order.
    #[must_use]
    pub fn identified(&self) -> &[&'a N] {
        &self.identified
    }

    /// Whether `node` has exactly one candidate.
    pub fn is_identified(&self, node: &N) -> bool {
        self.identified.iter().any(|n| *n == node)
    }

    /// Nodes whose own identifier is not a candidate, when the ground-truth
    /// check was requested.
    #[must_use]
    pub fn missing_ground_truth(&self) -> Option<&[&'a N]> {
        self.missing_ground_truth.as_deref()
    }
}

fn full_list<T: Debug>(items: &[T]) -> String {
    format!("[{}]", items.iter().map(|i| format!("{i:?}")).join(", "))
}

impl<N: NodeKey, C: NodeKey> fmt::Display for Summary<'_, N, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(
                f,
                "{:?} has {} candidates: {}",
                row.node,
                row.candidates.len(),
                self.config.abbreviate(&row.candidates)
            )?;
        }

        if !self.identified.is_empty() {
            writeln!(
                f,
                "{} template nodes have 1 candidate: {}",
                self.identified.len(),
                full_list(&self.identified)
            )?;
        }

        if let Some(missing) = self.missing_ground_truth.as_ref().filter(|m| !m.is_empty()) {
            writeln!(
                f,
                "{} nodes are missing ground truth candidate: {}",
                missing.len(),
                full_list(missing)
            )?;
        }
        Ok(())
    }
}
