use std::collections::BTreeMap;

use delimitless_core::errors::{AlignError, ErrorInfo};
use delimitless_core::CellIdx;
use serde::{Deserialize, Serialize};

use crate::grid::TokenGrid;
use crate::mutate::merge_next_cell;

/// Shannon entropy (nats) of the value distribution in column `col`.
pub fn entropy_of_col(grid: &TokenGrid, col: usize) -> Result<f64, AlignError> {
    let values = grid.column_values(col)?;
    Ok(shannon(&values))
}

fn shannon(values: &[&str]) -> f64 {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(*value).or_insert(0) += 1;
    }
    let total = values.len() as f64;
    counts
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.ln()
        })
        .sum()
}

/// Entropy of every column, left to right.
pub fn column_entropies(grid: &TokenGrid) -> Vec<f64> {
    (0..grid.n_cols())
        .map(|col| {
            let values: Vec<&str> = grid.rows().map(|row| row[col].value.as_str()).collect();
            shannon(&values)
        })
        .collect()
}

/// Sum of the column entropies; lower means better aligned.
pub fn total_entropy(grid: &TokenGrid) -> f64 {
    column_entropies(grid).into_iter().sum()
}

/// `total_entropy(candidate) - total_entropy(current)`; negative is an improvement.
pub fn diff_entropy(current: &TokenGrid, candidate: &TokenGrid) -> f64 {
    total_entropy(candidate) - total_entropy(current)
}

/// Entropy change of each single-cell merge, shaped `rows x (columns - 1)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMergeDeltas")]
pub struct MergeDeltas {
    n_rows: usize,
    n_merges: usize,
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct RawMergeDeltas {
    n_rows: usize,
    n_merges: usize,
    values: Vec<f64>,
}

impl TryFrom<RawMergeDeltas> for MergeDeltas {
    type Error = AlignError;

    fn try_from(raw: RawMergeDeltas) -> Result<Self, Self::Error> {
        Self::from_parts(raw.n_rows, raw.n_merges, raw.values)
    }
}

impl MergeDeltas {
    /// Builds a matrix from row-major `values`, which must hold `n_rows * n_merges` entries.
    pub fn from_parts(
        n_rows: usize,
        n_merges: usize,
        values: Vec<f64>,
    ) -> Result<Self, AlignError> {
        if n_rows.checked_mul(n_merges) != Some(values.len()) {
            return Err(AlignError::InvalidArgument(
                ErrorInfo::new("deltas-shape-mismatch", "delta count does not match the shape")
                    .with_context("shape", format!("{n_rows}x{n_merges}"))
                    .with_context("values", values.len().to_string()),
            ));
        }
        Ok(Self {
            n_rows,
            n_merges,
            values,
        })
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of merge positions per row.
    pub fn n_merges(&self) -> usize {
        self.n_merges
    }

    /// Delta for merging `(row, col)` with its right neighbour.
    pub fn get(&self, at: CellIdx) -> Option<f64> {
        if at.row < self.n_rows && at.col < self.n_merges {
            self.values.get(at.row * self.n_merges + at.col).copied()
        } else {
            None
        }
    }

    /// Deltas for every merge position of `row`, or `None` past the last row.
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row >= self.n_rows {
            return None;
        }
        let start = row * self.n_merges;
        self.values.get(start..start + self.n_merges)
    }

    /// The most negative delta and its position, if any merge lowers entropy.
    pub fn best(&self) -> Option<(CellIdx, f64)> {
        let mut best: Option<(CellIdx, f64)> = None;
        for row in 0..self.n_rows {
            for (col, &delta) in self.row(row).unwrap_or_default().iter().enumerate() {
                if delta < 0.0 && best.map_or(true, |(_, current)| delta < current) {
                    best = Some((CellIdx::new(row, col), delta));
                }
            }
        }
        best
    }
}

/// Evaluates [`merge_next_cell`] (with propagation) at every mergeable cell.
pub fn entropy_per_merge(grid: &TokenGrid) -> Result<MergeDeltas, AlignError> {
    let n_rows = grid.n_rows();
    let n_merges = grid.n_cols().saturating_sub(1);
    let baseline = total_entropy(grid);
    let mut values = Vec::with_capacity(n_rows * n_merges);
    for row in 0..n_rows {
        for col in 0..n_merges {
            let outcome = merge_next_cell(grid, CellIdx::new(row, col), true)?;
            values.push(total_entropy(&outcome.grid) - baseline);
        }
    }
    MergeDeltas::from_parts(n_rows, n_merges, values)
}
