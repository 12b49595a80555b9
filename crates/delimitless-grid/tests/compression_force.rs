use delimitless_grid::{
    compression_force, compression_force_with, connection_tension, entropy_per_merge, CellIdx,
    GridOpts, MergeDeltas, TokenArray, TokenGrid,
};

const LN2: f64 = std::f64::consts::LN_2;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

fn grid() -> TokenGrid {
    // [k, v, 1]
    // [k, 1, ""]
    TokenGrid::from_strings(&["k_v_1", "k_1"]).unwrap()
}

#[test]
fn merge_deltas_match_hand_computed_entropy() {
    let deltas = entropy_per_merge(&grid()).unwrap();
    assert_eq!((deltas.n_rows(), deltas.n_merges()), (2, 2));
    assert!(close(deltas.get(CellIdx::new(0, 0)).unwrap(), -LN2));
    assert!(close(deltas.get(CellIdx::new(0, 1)).unwrap(), -LN2));
    assert!(close(deltas.get(CellIdx::new(1, 0)).unwrap(), LN2));
    assert!(close(deltas.get(CellIdx::new(1, 1)).unwrap(), 0.0));
    assert_eq!(deltas.get(CellIdx::new(0, 2)), None);
    assert_eq!(deltas.row(2), None);
}

#[test]
fn best_merge_is_first_most_negative_delta() {
    let deltas = entropy_per_merge(&grid()).unwrap();
    let (at, delta) = deltas.best().unwrap();
    // (0, 0) and (0, 1) tie at -ln 2; row-major order keeps the first.
    assert_eq!(at, CellIdx::new(0, 0));
    assert!(close(delta, -LN2));
}

#[test]
fn malformed_serialized_deltas_are_refused() {
    let err = serde_json::from_str::<MergeDeltas>(r#"{"n_rows":2,"n_merges":1,"values":[]}"#)
        .unwrap_err();
    assert!(err.to_string().contains("deltas-shape-mismatch"));

    let deltas = entropy_per_merge(&grid()).unwrap();
    let json = serde_json::to_string(&deltas).unwrap();
    assert_eq!(serde_json::from_str::<MergeDeltas>(&json).unwrap(), deltas);

    // Well-formed deltas for a grid of another shape are an error, not a panic.
    let small = TokenGrid::from_strings(&["a1", "b2"]).unwrap();
    let foreign = MergeDeltas::from_parts(2, 1, vec![0.0, 0.0]).unwrap();
    assert!(compression_force_with(&small, &foreign, CellIdx::new(1, 1), 1.0).is_ok());
    let err = compression_force_with(&grid(), &foreign, CellIdx::new(1, 1), 1.0).unwrap_err();
    assert_eq!(err.info().code, "deltas-shape-mismatch");
}

#[test]
fn boxed_in_token_collects_tied_left_merges() {
    let force = compression_force(&grid(), CellIdx::new(0, 2), 1.0).unwrap();
    assert!(close(force.left, 2.0 * LN2));
    assert_eq!(force.left_merge_cols, Some(vec![0, 1]));
    assert_eq!(force.right, 0.0);
    assert_eq!(force.right_merge_cols, None);
}

#[test]
fn middle_token_sees_both_sides() {
    let force = compression_force(&grid(), CellIdx::new(0, 1), 1.0).unwrap();
    assert!(close(force.left, LN2));
    assert_eq!(force.left_merge_cols, Some(vec![0]));
    assert!(close(force.right, LN2));
    assert_eq!(force.right_merge_cols, Some(vec![1]));
}

#[test]
fn room_to_slide_cancels_force() {
    // Row 1 has a blank on the right, and nothing left of column 0 lowers entropy.
    let force = compression_force(&grid(), CellIdx::new(1, 0), 1.0).unwrap();
    assert_eq!(force.right, 0.0);
    assert_eq!(force.right_merge_cols, None);
    assert_eq!(force.left, 0.0);
    assert_eq!(force.left_merge_cols, None);
}

#[test]
fn precomputed_deltas_give_same_force() {
    let grid = grid();
    let deltas = entropy_per_merge(&grid).unwrap();
    for at in grid.tokens().map(|token| token.idx()) {
        assert_eq!(
            compression_force_with(&grid, &deltas, at, 1.0).unwrap(),
            compression_force(&grid, at, 1.0).unwrap()
        );
    }
}

#[test]
fn gains_scale_forces_and_tension() {
    let grid = grid();
    let at = CellIdx::new(0, 2);
    let force = compression_force(&grid, at, 2.5).unwrap();
    assert!(close(force.left, 2.5 * 2.0 * LN2));

    // "1" at (0, 2) is matched by "1" at (1, 1): offset -1 over three columns.
    assert!(close(connection_tension(&grid, at, 3.0).unwrap(), -1.0));

    let opts = GridOpts {
        tension_gain: 3.0,
        compression_gain: 2.5,
        ..GridOpts::default()
    };
    let array = TokenArray::with_opts(&["k_v_1", "k_1"], opts).unwrap();
    assert_eq!(array.compression_force(at).unwrap(), force);
    assert!(close(array.connection_tension(at).unwrap(), -1.0));
}

#[test]
fn out_of_range_positions_are_rejected() {
    let err = compression_force(&grid(), CellIdx::new(2, 0), 1.0).unwrap_err();
    assert_eq!(err.info().code, "cell-out-of-range");
}

#[test]
fn deltas_from_another_grid_are_rejected() {
    let other = TokenGrid::from_strings(&["k_v_1_x", "k_1"]).unwrap();
    let deltas = entropy_per_merge(&other).unwrap();
    let err = compression_force_with(&grid(), &deltas, CellIdx::new(0, 0), 1.0).unwrap_err();
    assert_eq!(err.info().code, "deltas-shape-mismatch");
}
