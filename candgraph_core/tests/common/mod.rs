#![allow(dead_code)]

use std::sync::Once;

use candgraph_core::{GraphCore, SparseMatrix};

static INIT: Once = Once::new();

/// Configures logging for the test runner.
pub fn setup_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

lazy_static::lazy_static! {
    /// a -> b -> c on a single channel.
    pub static ref PATH_ABC: GraphCore<&'static str> = GraphCore::new(
        ["a", "b", "c"],
        ["e"],
        [SparseMatrix::from_edges(3, [(0, 1), (1, 2)]).expect("edges in range")],
    )
    .expect("valid path graph");

    /// Four nodes, two channels that overlap on 0 -> 1.
    pub static ref TWO_CHANNELS: GraphCore<u32> = GraphCore::new(
        [10, 11, 12, 13],
        ["A", "B"],
        [
            SparseMatrix::from_edges(4, [(0, 1), (2, 3)]).expect("edges in range"),
            SparseMatrix::from_edges(4, [(0, 1), (3, 0), (1, 1)]).expect("edges in range"),
        ],
    )
    .expect("valid two-channel graph");
}

/// Random edge list over `n` nodes, for property tests.
pub fn reduce_edges(n: usize, raw: &[(u8, u8)]) -> Vec<(usize, usize)> {
    if n == 0 {
        return Vec::new();
    }
    raw.iter()
        .map(|&(a, b)| (usize::from(a) % n, usize::from(b) % n))
        .collect()
}

/// Random weighted triplets over `n` nodes. Roughly a third of the weights
/// are zero and a third sit just below `u32::MAX`.
pub fn weighted_triplets(n: usize, raw: &[(u8, u8, u32)]) -> Vec<(usize, usize, u32)> {
    if n == 0 {
        return Vec::new();
    }
    raw.iter()
        .map(|&(a, b, w)| {
            let weight = match w % 3 {
                0 => 0,
                1 => u32::MAX - w % 5,
                _ => w,
            };
            (usize::from(a) % n, usize::from(b) % n, weight)
        })
        .collect()
}
