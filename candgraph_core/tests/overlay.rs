#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use candgraph_core::{
    BitMatrix, CandidateOverlay, GraphError, LabelMode, NodeIdx, SparseMatrix, SummaryConfig,
};
use quickcheck::quickcheck;
use rstest::{fixture, rstest};

mod common;

use common::{PATH_ABC, setup_test_logging};

#[fixture]
fn xy() -> CandidateOverlay<&'static str, u32> {
    setup_test_logging();
    let is_candidate =
        BitMatrix::from_rows(3, &[[true, true, false], [false, true, false]]).unwrap();
    CandidateOverlay::new(
        [1, 2, 3],
        ["x", "y"],
        ["e"],
        [SparseMatrix::from_edges(2, [(0, 1)]).unwrap()],
        Some(is_candidate),
    )
    .unwrap()
}

#[rstest]
fn counts_and_identification(xy: CandidateOverlay<&'static str, u32>) {
    assert_eq!(xy.candidate_counts(), vec![2, 1]);
    let summary = xy.summarize();
    assert_eq!(summary.identified(), &[&"y"]);
    assert!(summary.is_identified(&"y"));
    assert!(!summary.is_identified(&"x"));
}

#[rstest]
#[case("x", vec![1, 2])]
#[case("y", vec![2])]
fn candidates_match_counts(
    xy: CandidateOverlay<&'static str, u32>,
    #[case] node: &'static str,
    #[case] expected: Vec<u32>,
) {
    let found: Vec<u32> = xy.candidates_for(&node).unwrap().into_iter().copied().collect();
    assert_eq!(found, expected);
    let i = xy.graph().node_index(&node).unwrap().as_usize();
    assert_eq!(found.len(), xy.candidate_counts()[i]);
}

#[rstest]
fn unknown_node_lookup(xy: CandidateOverlay<&'static str, u32>) {
    assert!(matches!(
        xy.candidates_for(&"w"),
        Err(GraphError::UnknownNode(_))
    ));
}

#[test]
fn default_matrix_is_all_true() {
    let o: CandidateOverlay<&str, char> = CandidateOverlay::new(
        ['p', 'q', 'r', 's'],
        ["a", "b", "c"],
        ["e"],
        [SparseMatrix::zeros((3, 3))],
        None,
    )
    .unwrap();
    assert_eq!(o.is_candidate().shape(), (3, 4));
    assert_eq!(o.candidate_counts(), vec![4, 4, 4]);
    assert!(o.summarize().identified().is_empty());
}

#[test]
fn candidate_matrix_shape_is_checked() {
    let err = CandidateOverlay::new(
        [1_u32, 2],
        ["x"],
        ["e"],
        [SparseMatrix::zeros((1, 1))],
        Some(BitMatrix::ones(1, 3)),
    )
    .unwrap_err();
    assert_eq!(
        err,
        GraphError::ShapeMismatch {
            context: "candidate matrix".into(),
            expected: "1x2".into(),
            actual: "1x3".into(),
        }
    );
}

#[test]
fn overlay_over_existing_graph() {
    let o = CandidateOverlay::from_graph(PATH_ABC.copy(), ["u", "v"], None).unwrap();
    assert_eq!(o.graph().neighbor_pairs().len(), 2);
    assert_eq!(o.candidate_counts(), vec![2, 2, 2]);
}

#[rstest]
fn copies_prune_independently(xy: CandidateOverlay<&'static str, u32>) {
    let mut pruned = xy.copy();
    assert!(pruned.remove_candidate(&"x", &1).unwrap());
    assert_eq!(pruned.candidate_counts(), vec![1, 1]);
    assert!(pruned.all_identified());
    assert_eq!(xy.candidate_counts(), vec![2, 1]);
    assert_eq!(pruned.candidates(), xy.candidates());
}

#[rstest]
fn pruning_to_empty_is_reported(mut xy: CandidateOverlay<&'static str, u32>) {
    let removed = xy
        .retain_candidates(NodeIdx::new(1), |_| false)
        .unwrap();
    assert_eq!(removed, 1);
    assert!(xy.has_infeasible_node());
    assert_eq!(xy.infeasible_nodes(), vec![&"y"]);
    assert!(xy.summarize().identified().is_empty());
}

#[rstest]
fn induced_overlay(xy: CandidateOverlay<&'static str, u32>) {
    let sub = xy.induce_subgraph(&[NodeIdx::new(1), NodeIdx::new(0)]).unwrap();
    assert_eq!(sub.candidate_counts(), vec![1, 2]);
    assert_eq!(
        sub.graph().neighbor_pairs(),
        &[(NodeIdx::new(1), NodeIdx::new(0))]
    );
    assert!(xy.induce_subgraph(&[NodeIdx::new(2)]).is_err());
}

#[rstest]
fn report_and_labels(xy: CandidateOverlay<&'static str, u32>) {
    let text = xy
        .summarize()
        .with_config(SummaryConfig::default().threshold(1).edge_items(0))
        .to_string();
    assert_eq!(
        text,
        "\"x\" has 2 candidates: [...]\n\
         \"y\" has 1 candidates: [2]\n\
         1 template nodes have 1 candidate: [\"y\"]\n"
    );
    assert_eq!(xy.node_labels(LabelMode::CandidateCount), vec!["2", "1"]);
}

#[test]
fn shared_namespace_ground_truth() {
    let is_candidate = BitMatrix::from_rows(3, &[[true, true, false], [true, false, true]]).unwrap();
    let o: CandidateOverlay<u32> = CandidateOverlay::new(
        [1, 2, 3],
        [1, 2],
        ["e"],
        [SparseMatrix::zeros((2, 2))],
        Some(is_candidate),
    )
    .unwrap();
    assert_eq!(o.missing_ground_truth(), vec![&2]);
    assert_eq!(
        o.summarize_with_ground_truth().missing_ground_truth(),
        Some(&[&2][..])
    );
}

quickcheck! {
    fn prop_candidates_for_matches_counts(bits: Vec<bool>) -> bool {
        let cols = 5;
        let rows: Vec<Vec<bool>> = bits.chunks_exact(cols).map(<[bool]>::to_vec).collect();
        let n = rows.len();
        let m = BitMatrix::from_rows(cols, &rows).unwrap();
        let o = CandidateOverlay::new(
            0..cols,
            0..n,
            ["e"],
            [SparseMatrix::zeros((n, n))],
            Some(m),
        )
        .unwrap();
        let counts = o.candidate_counts();
        (0..n).all(|i| o.candidates_for(&i).unwrap().len() == counts[i])
    }
}
