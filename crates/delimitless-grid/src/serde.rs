use delimitless_core::errors::{AlignError, ErrorInfo};
use delimitless_core::SchemaVersion;
use serde::{Deserialize, Serialize};

use crate::grid::TokenGrid;
use crate::report::{AlignmentReport, REPORT_SCHEMA};

/// Schema version written by [`grid_to_json`].
pub const GRID_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

fn map_err(err: serde_json::Error, code: &str) -> AlignError {
    AlignError::Serde(ErrorInfo::new(code, err.to_string()))
}

fn check_schema(expected: SchemaVersion, found: SchemaVersion) -> Result<(), AlignError> {
    if expected.is_compatible(&found) {
        Ok(())
    } else {
        Err(AlignError::Serde(
            ErrorInfo::new("schema-mismatch", "payload schema is not readable")
                .with_context(
                    "expected",
                    format!("{}.{}.{}", expected.major, expected.minor, expected.patch),
                )
                .with_context(
                    "found",
                    format!("{}.{}.{}", found.major, found.minor, found.patch),
                ),
        ))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableGrid {
    schema_version: SchemaVersion,
    separator: char,
    values: Vec<Vec<String>>,
}

/// Serialises a grid's values to JSON; tensions are recomputed on load.
pub fn grid_to_json(grid: &TokenGrid) -> Result<String, AlignError> {
    let payload = SerializableGrid {
        schema_version: GRID_SCHEMA,
        separator: grid.separator(),
        values: grid.values(),
    };
    serde_json::to_string_pretty(&payload).map_err(|err| map_err(err, "grid-serialize"))
}

/// Restores a grid from JSON.
pub fn grid_from_json(json: &str) -> Result<TokenGrid, AlignError> {
    let payload: SerializableGrid =
        serde_json::from_str(json).map_err(|err| map_err(err, "grid-deserialize"))?;
    check_schema(GRID_SCHEMA, payload.schema_version)?;
    TokenGrid::from_values(payload.values, payload.separator)
}

/// Serialises an alignment report to JSON.
pub fn report_to_json(report: &AlignmentReport) -> Result<String, AlignError> {
    serde_json::to_string_pretty(report).map_err(|err| map_err(err, "report-serialize"))
}

/// Restores an alignment report from JSON.
pub fn report_from_json(json: &str) -> Result<AlignmentReport, AlignError> {
    let report: AlignmentReport =
        serde_json::from_str(json).map_err(|err| map_err(err, "report-deserialize"))?;
    check_schema(REPORT_SCHEMA, report.schema_version)?;
    Ok(report)
}
