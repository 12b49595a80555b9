use std::collections::BTreeSet;

use delimitless_core::errors::AlignError;
use delimitless_core::{CellIdx, Diagnostic, Direction};
use serde::{Deserialize, Serialize};

use crate::entropy::{self, MergeDeltas};
use crate::grid::TokenGrid;
use crate::mutate::{self, MutationOutcome};
use crate::params::GridOpts;
use crate::tension::{self, CompressionForce};

/// How an adoption request was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdoptionStatus {
    /// The candidate replaced the current grid.
    Adopted,
    /// The candidate was identical to the current grid.
    Unchanged,
    /// The candidate altered a frozen cell and was discarded.
    Rejected {
        /// First frozen cell found to differ.
        at: CellIdx,
    },
}

/// Result of asking a [`TokenArray`] to adopt a mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adoption {
    /// Resolution of the request.
    pub status: AdoptionStatus,
    /// Diagnostics from evaluating and adopting the mutation.
    pub diagnostics: Vec<Diagnostic>,
}

impl Adoption {
    /// Returns true when the array's grid changed.
    pub fn is_adopted(&self) -> bool {
        self.status == AdoptionStatus::Adopted
    }

    /// Returns true when the frozen-column guard refused the candidate.
    pub fn is_rejected(&self) -> bool {
        matches!(self.status, AdoptionStatus::Rejected { .. })
    }
}

/// Owns the working grid for a batch of strings and guards its frozen columns.
///
/// Mutation methods without a suffix only evaluate the change. Their `_in_place` twins
/// route the result through [`TokenArray::adopt`], which is the only place the grid is
/// replaced.
#[derive(Debug, Clone)]
pub struct TokenArray {
    raw_items: Vec<String>,
    grid: TokenGrid,
    frozen: BTreeSet<CellIdx>,
    opts: GridOpts,
}

impl TokenArray {
    /// Tokenizes `items` with default options.
    pub fn new<S: AsRef<str>>(items: &[S]) -> Result<Self, AlignError> {
        Self::with_opts(items, GridOpts::default())
    }

    /// Tokenizes `items` using `opts`.
    pub fn with_opts<S: AsRef<str>>(items: &[S], opts: GridOpts) -> Result<Self, AlignError> {
        let opts = opts.sanitised();
        let grid = TokenGrid::from_strings_with(items, opts.separator)?;
        let mut array = Self {
            raw_items: items.iter().map(|item| item.as_ref().to_owned()).collect(),
            grid,
            frozen: BTreeSet::new(),
            opts,
        };
        array.refreeze();
        Ok(array)
    }

    /// Original input strings.
    pub fn raw_items(&self) -> &[String] {
        &self.raw_items
    }

    /// Current grid.
    pub fn grid(&self) -> &TokenGrid {
        &self.grid
    }

    /// Current value matrix.
    pub fn values(&self) -> Vec<Vec<String>> {
        self.grid.values()
    }

    /// Options in effect.
    pub fn opts(&self) -> &GridOpts {
        &self.opts
    }

    /// Cells currently protected from in-place changes.
    pub fn frozen_cells(&self) -> &BTreeSet<CellIdx> {
        &self.frozen
    }

    /// Columns currently frozen, ascending.
    pub fn frozen_columns(&self) -> Vec<usize> {
        let cols: BTreeSet<usize> = self.frozen.iter().map(|idx| idx.col).collect();
        cols.into_iter().collect()
    }

    /// Returns true when `col` is frozen.
    pub fn is_frozen(&self, col: usize) -> bool {
        self.frozen.contains(&CellIdx::new(0, col))
    }

    fn refreeze(&mut self) {
        let n_rows = self.grid.n_rows();
        self.frozen = self
            .grid
            .uniform_columns()
            .into_iter()
            .flat_map(|col| (0..n_rows).map(move |row| CellIdx::new(row, col)))
            .collect();
    }

    /// Returns the first frozen cell whose value differs (or is missing) in `candidate`.
    pub fn frozen_violation(&self, candidate: &TokenGrid) -> Option<CellIdx> {
        self.frozen
            .iter()
            .copied()
            .find(|idx| self.grid.value(*idx) != candidate.value(*idx))
    }

    /// Adopts `outcome` as the current grid unless it alters a frozen cell.
    ///
    /// `bypass` skips the frozen check entirely. Frozen cells are recomputed after every
    /// adoption.
    pub fn adopt(&mut self, outcome: MutationOutcome, bypass: bool) -> Adoption {
        let MutationOutcome {
            grid,
            changed,
            mut diagnostics,
        } = outcome;

        if !bypass {
            if let Some(at) = self.frozen_violation(&grid) {
                diagnostics.push(
                    Diagnostic::warning(
                        "frozen-cell-modified",
                        "candidate grid modifies a frozen value; keeping current grid",
                    )
                    .with_context("cell", at.to_string())
                    .with_context("current", format!("{:?}", self.grid.values()))
                    .emit(),
                );
                return Adoption {
                    status: AdoptionStatus::Rejected { at },
                    diagnostics,
                };
            }
        }

        self.grid = grid;
        self.refreeze();
        tracing::debug!(
            changed,
            shape = ?self.grid.shape(),
            frozen_columns = ?self.frozen_columns(),
            "adopted candidate grid"
        );
        Adoption {
            status: if changed {
                AdoptionStatus::Adopted
            } else {
                AdoptionStatus::Unchanged
            },
            diagnostics,
        }
    }

    /// Entropy of column `col` of the current grid.
    pub fn entropy_of_col(&self, col: usize) -> Result<f64, AlignError> {
        entropy::entropy_of_col(&self.grid, col)
    }

    /// Total entropy of the current grid.
    pub fn total_entropy(&self) -> f64 {
        entropy::total_entropy(&self.grid)
    }

    /// Entropy change of `candidate` relative to the current grid.
    pub fn diff_entropy(&self, candidate: &TokenGrid) -> f64 {
        entropy::diff_entropy(&self.grid, candidate)
    }

    /// Merge-delta matrix of the current grid.
    pub fn entropy_per_merge(&self) -> Result<MergeDeltas, AlignError> {
        entropy::entropy_per_merge(&self.grid)
    }

    /// Tension stored on the token at `at`.
    pub fn tension(&self, at: CellIdx) -> Result<f64, AlignError> {
        Ok(self.grid.token(at)?.tension)
    }

    /// Width-normalised tension of `at`, scaled by the configured gain.
    pub fn connection_tension(&self, at: CellIdx) -> Result<f64, AlignError> {
        tension::connection_tension(&self.grid, at, self.opts.tension_gain)
    }

    /// Compression force on `at`, scaled by the configured gain.
    pub fn compression_force(&self, at: CellIdx) -> Result<CompressionForce, AlignError> {
        tension::compression_force(&self.grid, at, self.opts.compression_gain)
    }

    /// Evaluates merging `at` with its right neighbour.
    pub fn merge_next_cell(&self, at: impl Into<CellIdx>) -> Result<MutationOutcome, AlignError> {
        mutate::merge_next_cell(&self.grid, at, self.opts.propagate_merges)
    }

    /// Merges `at` with its right neighbour through the frozen guard.
    pub fn merge_next_cell_in_place(
        &mut self,
        at: impl Into<CellIdx>,
    ) -> Result<Adoption, AlignError> {
        let outcome = self.merge_next_cell(at)?;
        Ok(self.adopt(outcome, false))
    }

    /// Evaluates merging column `col` with the next column.
    pub fn merge_next_col(&self, col: usize) -> Result<MutationOutcome, AlignError> {
        mutate::merge_next_col(&self.grid, col)
    }

    /// Merges column `col` with the next column.
    ///
    /// Collapsing a column shifts every frozen position to its right, so this always
    /// bypasses the frozen guard.
    pub fn merge_next_col_in_place(&mut self, col: usize) -> Result<Adoption, AlignError> {
        let outcome = self.merge_next_col(col)?;
        Ok(self.adopt(outcome, true))
    }

    /// Evaluates sliding `at` one cell in `direction`.
    pub fn slide_token(
        &self,
        at: impl Into<CellIdx>,
        direction: Direction,
    ) -> Result<MutationOutcome, AlignError> {
        mutate::slide_token(&self.grid, at, direction)
    }

    /// Evaluates sliding `at` one cell to the left.
    pub fn slide_token_left(&self, at: impl Into<CellIdx>) -> Result<MutationOutcome, AlignError> {
        self.slide_token(at, Direction::Left)
    }

    /// Evaluates sliding `at` one cell to the right.
    pub fn slide_token_right(&self, at: impl Into<CellIdx>) -> Result<MutationOutcome, AlignError> {
        self.slide_token(at, Direction::Right)
    }

    /// Slides `at` one cell in `direction` through the frozen guard.
    pub fn slide_token_in_place(
        &mut self,
        at: impl Into<CellIdx>,
        direction: Direction,
    ) -> Result<Adoption, AlignError> {
        let outcome = self.slide_token(at, direction)?;
        Ok(self.adopt(outcome, false))
    }

    /// Evaluates dropping column `col`.
    pub fn drop_col(&self, col: usize) -> Result<MutationOutcome, AlignError> {
        mutate::drop_col(&self.grid, col)
    }

    /// Drops column `col` through the frozen guard.
    pub fn drop_col_in_place(&mut self, col: usize) -> Result<Adoption, AlignError> {
        let outcome = self.drop_col(col)?;
        Ok(self.adopt(outcome, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frozen_cells_cover_uniform_columns_at_construction() {
        let array = TokenArray::new(&["QCDHT1000_16", "QCDHT1000_17"]).unwrap();
        assert_eq!(array.frozen_columns(), vec![0, 1]);
        assert_eq!(array.frozen_cells().len(), 4);
        assert!(array.is_frozen(1));
        assert!(!array.is_frozen(2));
    }

    #[test]
    fn unchanged_outcome_is_reported() {
        let mut array = TokenArray::new(&["a1", "b2"]).unwrap();
        let adoption = array.slide_token_in_place(CellIdx::new(0, 0), Direction::Right).unwrap();
        assert_eq!(adoption.status, AdoptionStatus::Unchanged);
        assert_eq!(adoption.diagnostics[0].code, "no-room");
    }

    #[test]
    fn options_flow_into_grid() {
        let opts = GridOpts {
            separator: '.',
            ..GridOpts::default()
        };
        let mut array = TokenArray::with_opts(&["v1a", "v2b"], opts).unwrap();
        assert!(array.merge_next_col_in_place(1).unwrap().is_adopted());
        assert_eq!(array.values()[0], vec!["v", "1.a"]);
    }
}
