use delimitless_core::SchemaVersion;
use serde::{Deserialize, Serialize};

use crate::array::TokenArray;
use crate::entropy::column_entropies;
use crate::hash::canonical_hash;

/// Schema version written into every [`AlignmentReport`].
pub const REPORT_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Snapshot of a [`TokenArray`] suitable for persisting or diffing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentReport {
    /// Schema of the payload.
    pub schema_version: SchemaVersion,
    /// Strings the array was built from.
    pub raw_items: Vec<String>,
    /// Current value matrix.
    pub values: Vec<Vec<String>>,
    /// Frozen column indices.
    pub frozen_columns: Vec<usize>,
    /// Entropy per column.
    pub column_entropy: Vec<f64>,
    /// Sum of [`AlignmentReport::column_entropy`].
    pub total_entropy: f64,
    /// Canonical hash of the current grid.
    pub grid_hash: String,
}

impl AlignmentReport {
    /// Captures the current state of `array`.
    pub fn capture(array: &TokenArray) -> Self {
        let column_entropy = column_entropies(array.grid());
        let total_entropy = column_entropy.iter().sum();
        Self {
            schema_version: REPORT_SCHEMA,
            raw_items: array.raw_items().to_vec(),
            values: array.values(),
            frozen_columns: array.frozen_columns(),
            column_entropy,
            total_entropy,
            grid_hash: canonical_hash(array.grid()),
        }
    }
}

impl TokenArray {
    /// Captures an [`AlignmentReport`] of the current state.
    pub fn report(&self) -> AlignmentReport {
        AlignmentReport::capture(self)
    }
}
