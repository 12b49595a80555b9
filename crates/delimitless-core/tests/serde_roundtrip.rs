use delimitless_core::{AlignError, CellIdx, Diagnostic, DiagnosticLevel, ErrorInfo, SchemaVersion};

#[test]
fn error_round_trip_json() {
    let err = AlignError::InvalidArgument(
        ErrorInfo::new("no-tokens", "input produced no tokens").with_context("row", "3"),
    );
    let json = serde_json::to_string_pretty(&err).expect("serialize");
    assert!(json.contains("\"family\": \"InvalidArgument\""));
    let decoded: AlignError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, err);
}

#[test]
fn diagnostic_round_trip_json() {
    let diag = Diagnostic::warning("frozen-cell-modified", "rejected")
        .with_context("cell", CellIdx::new(0, 1).to_string());
    let json = serde_json::to_string(&diag).expect("serialize");
    assert!(json.contains("\"level\":\"warning\""));
    let decoded: Diagnostic = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, diag);
    assert_eq!(decoded.level, DiagnosticLevel::Warning);
}

#[test]
fn schema_version_compatibility() {
    let current = SchemaVersion::new(1, 2, 0);
    assert!(current.is_compatible(&SchemaVersion::new(1, 0, 4)));
    assert!(!current.is_compatible(&SchemaVersion::new(2, 0, 0)));
    assert!(!current.is_compatible(&SchemaVersion::new(1, 3, 0)));
}
