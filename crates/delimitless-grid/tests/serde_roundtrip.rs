use std::fs;

use delimitless_grid::serde_io::{grid_from_json, grid_to_json, report_from_json, report_to_json};
use delimitless_grid::{canonical_hash, AlignError, CellIdx, GridOpts, TokenArray, TokenGrid};
use tempfile::tempdir;

#[test]
fn grid_json_roundtrip_preserves_hash() {
    let items = ["THselection_QCD_16.root", "THselection_TT_17.root"];
    let grid = TokenGrid::from_strings_with(&items, '.').unwrap();
    let json = grid_to_json(&grid).unwrap();
    let restored = grid_from_json(&json).unwrap();
    assert_eq!(restored, grid);
    assert_eq!(restored.separator(), '.');
    assert_eq!(canonical_hash(&restored), canonical_hash(&grid));

    // tensions are derived on load rather than stored
    let at = CellIdx::new(0, 1);
    assert_eq!(restored.token(at).unwrap().tension, grid.token(at).unwrap().tension);
    assert!(!json.contains("tension"));
}

#[test]
fn report_json_roundtrip() {
    let mut array = TokenArray::new(&["QCDHT1000_16", "QCDHT1000_17"]).unwrap();
    array.merge_next_col_in_place(0).unwrap();
    let report = array.report();
    assert_eq!(report.frozen_columns, vec![0]);
    assert_eq!(report.grid_hash, canonical_hash(array.grid()));

    let restored = report_from_json(&report_to_json(&report).unwrap()).unwrap();
    assert_eq!(restored.raw_items, report.raw_items);
    assert_eq!(restored.values, report.values);
    assert_eq!(restored.frozen_columns, report.frozen_columns);
    assert_eq!(restored.grid_hash, report.grid_hash);
    assert_eq!(restored.column_entropy.len(), report.column_entropy.len());
    assert!((restored.total_entropy - report.total_entropy).abs() < 1e-12);
}

#[test]
fn newer_major_schema_is_refused() {
    let array = TokenArray::new(&["a1", "b2"]).unwrap();
    let mut value: serde_json::Value =
        serde_json::from_str(&report_to_json(&array.report()).unwrap()).unwrap();
    value["schema_version"]["major"] = serde_json::json!(2);
    match report_from_json(&value.to_string()).unwrap_err() {
        AlignError::Serde(info) => {
            assert_eq!(info.code, "schema-mismatch");
            assert_eq!(info.context.get("found").map(String::as_str), Some("2.0.0"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let mut grid: serde_json::Value =
        serde_json::from_str(&grid_to_json(array.grid()).unwrap()).unwrap();
    grid["schema_version"]["minor"] = serde_json::json!(3);
    assert_eq!(
        grid_from_json(&grid.to_string()).unwrap_err().info().code,
        "schema-mismatch"
    );
}

#[test]
fn malformed_grid_json_is_serde_error() {
    let err = grid_from_json("{\"values\": 3}").unwrap_err();
    assert_eq!(err.info().code, "grid-deserialize");
}

#[test]
fn opts_load_from_yaml_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("opts.yaml");
    fs::write(&path, "separator: '_'\npropagate_merges: false\ncompression_gain: 0.5\n").unwrap();

    let opts = GridOpts::load(&path).unwrap();
    assert_eq!(opts.separator, '_');
    assert!(!opts.propagate_merges);
    assert_eq!(opts.tension_gain, 1.0);
    assert_eq!(opts.compression_gain, 0.5);

    let yaml = opts.to_yaml().unwrap();
    assert_eq!(GridOpts::from_yaml_str(&yaml).unwrap(), opts);

    let mut array = TokenArray::with_opts(&["a1b", "a1c"], opts).unwrap();
    array.merge_next_col_in_place(1).unwrap();
    assert_eq!(array.values()[0], vec!["a", "1_b"]);
}

#[test]
fn missing_opts_file_is_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    match GridOpts::load(&path).unwrap_err() {
        AlignError::Io(info) => {
            assert_eq!(info.code, "read-opts");
            assert!(info.context.contains_key("path"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
