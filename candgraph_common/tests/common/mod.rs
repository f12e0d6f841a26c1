use candgraph_common::SparseMatrix;
use quickcheck::{Arbitrary, Gen};

/// Assert that an invariant holds
#[macro_export]
macro_rules! assert_invariant {
    ($cond:expr, $invariant_name:expr) => {
        if !$cond {
            panic!(
                "Invariant violated: {}\nCondition: {}",
                $invariant_name,
                stringify!($cond)
            );
        }
    };
}

/// Random square adjacency of up to 7 nodes.
#[derive(Clone, Debug)]
pub struct SmallAdjacency(pub SparseMatrix);

/// Two random square adjacencies of the same size.
#[derive(Clone, Debug)]
pub struct AdjacencyPair(pub SparseMatrix, pub SparseMatrix);

fn random_edges(g: &mut Gen, n: usize) -> Vec<(usize, usize)> {
    if n == 0 {
        return Vec::new();
    }
    Vec::<(u8, u8)>::arbitrary(g)
        .into_iter()
        .map(|(a, b)| (usize::from(a) % n, usize::from(b) % n))
        .collect()
}

impl Arbitrary for SmallAdjacency {
    fn arbitrary(g: &mut Gen) -> Self {
        let n = usize::arbitrary(g) % 8;
        let edges = random_edges(g, n);
        Self(SparseMatrix::from_edges(n, edges).expect("edges are reduced modulo n"))
    }
}

impl Arbitrary for AdjacencyPair {
    fn arbitrary(g: &mut Gen) -> Self {
        let n = usize::arbitrary(g) % 8;
        let left = random_edges(g, n);
        let right = random_edges(g, n);
        Self(
            SparseMatrix::from_edges(n, left).expect("edges are reduced modulo n"),
            SparseMatrix::from_edges(n, right).expect("edges are reduced modulo n"),
        )
    }
}
