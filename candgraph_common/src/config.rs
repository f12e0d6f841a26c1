//! Formatting options for candidate summaries.
//!
//! Options are passed to each summary call; nothing here is process-wide.
//!
//! ```ignore
//! use candgraph_common::SummaryConfig;
//! let cfg = SummaryConfig::default().threshold(20).edge_items(3);
//! ```

use std::fmt::Debug;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// How candidate lists are abbreviated in textual summaries.
///
/// - threshold: lists longer than this are abbreviated.
/// - edge_items: entries kept at each end of an abbreviated list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Lists with more entries than this are abbreviated.
    pub threshold: usize,
    /// Entries shown at the start and at the end of an abbreviated list.
    pub edge_items: usize,
}

impl SummaryConfig {
    /// Create a new configuration.
    #[must_use]
    pub const fn new(threshold: usize, edge_items: usize) -> Self {
        Self {
            threshold,
            edge_items,
        }
    }

    /// Replace the abbreviation threshold.
    #[must_use]
    pub const fn threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// Replace the number of entries kept at each end.
    #[must_use]
    pub const fn edge_items(mut self, edge_items: usize) -> Self {
        self.edge_items = edge_items;
        self
    }

    /// Renders `items` as `[a, b, c]`, or `[a, b, ..., y, z]` when the list
    /// is longer than the threshold and the two ends do not overlap.
    pub fn abbreviate<T: Debug>(&self, items: &[T]) -> String {
        let abbreviated = items.len() > self.threshold && 2 * self.edge_items < items.len();
        let body = if abbreviated {
            let head = items[..self.edge_items].iter().map(|i| format!("{i:?}"));
            let tail = items[items.len() - self.edge_items..]
                .iter()
                .map(|i| format!("{i:?}"));
            head.chain(std::iter::once("...".to_owned()))
                .chain(tail)
                .join(", ")
        } else {
            items.iter().map(|i| format!("{i:?}")).join(", ")
        };
        format!("[{body}]")
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self::new(10, 6)
    }
}
