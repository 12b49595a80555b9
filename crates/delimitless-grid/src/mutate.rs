//! Pure structural rewrites of a [`TokenGrid`].
//!
//! Every function leaves its input untouched and returns a fresh grid inside a
//! [`MutationOutcome`]. Boundary cases (no next column, no blank to slide into) are no-ops
//! reported through the outcome's diagnostics rather than errors.

use std::collections::BTreeMap;

use delimitless_core::errors::{AlignError, ErrorInfo};
use delimitless_core::{CellIdx, Diagnostic, Direction};

use crate::grid::TokenGrid;
use crate::tension::nearest_blank_unchecked;

/// Result of evaluating a structural mutation.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    /// Grid after the mutation.
    pub grid: TokenGrid,
    /// Whether any value or the grid shape differs from the input.
    pub changed: bool,
    /// Notes about skipped or no-op work.
    pub diagnostics: Vec<Diagnostic>,
}

impl MutationOutcome {
    fn unchanged(grid: &TokenGrid, diagnostic: Diagnostic) -> Self {
        Self {
            grid: grid.clone(),
            changed: false,
            diagnostics: vec![diagnostic.emit()],
        }
    }

    fn rebuilt(
        before: &TokenGrid,
        values: Vec<Vec<String>>,
        diagnostics: Vec<Diagnostic>,
    ) -> Result<Self, AlignError> {
        let grid = TokenGrid::from_values(values, before.separator())?;
        let changed = grid != *before;
        Ok(Self {
            grid,
            changed,
            diagnostics,
        })
    }
}

/// Renders the value a merge of `left` and `right` would produce.
pub fn render_pair(left: &str, right: &str, separator: char) -> String {
    if right.is_empty() {
        left.to_owned()
    } else {
        format!("{left}{separator}{right}")
    }
}

/// Lists every position whose merge with its right neighbour would render `value`.
pub fn other_merged_pairs(grid: &TokenGrid, value: &str) -> Vec<CellIdx> {
    let separator = grid.separator();
    let mut out = Vec::new();
    for row in grid.rows() {
        for pair in row.windows(2) {
            if render_pair(&pair[0].value, &pair[1].value, separator) == value {
                out.push(pair[0].idx());
            }
        }
    }
    out
}

fn merge_in_row(row: &mut Vec<String>, col: usize, separator: char) {
    let right = row.remove(col + 1);
    if !right.is_empty() {
        let joined = render_pair(&row[col], &right, separator);
        row[col] = joined;
    }
    row.push(String::new());
}

/// Joins the cell at `at` with its right neighbour and shifts the rest of the row left.
///
/// With `propagate` set, every other pair in the grid rendering to the same merged value is
/// merged as well. Pairs overlapping an already selected merge in the same row are skipped.
pub fn merge_next_cell(
    grid: &TokenGrid,
    at: impl Into<CellIdx>,
    propagate: bool,
) -> Result<MutationOutcome, AlignError> {
    let at = grid.check(at.into())?;
    if at.col + 1 >= grid.n_cols() {
        return Ok(MutationOutcome::unchanged(
            grid,
            Diagnostic::debug("no-next-column", "cell is in the last column; merge skipped")
                .with_context("cell", at.to_string())
                .with_context("columns", grid.n_cols().to_string()),
        ));
    }

    let separator = grid.separator();
    let row = grid.row(at.row);
    let merged = render_pair(&row[at.col].value, &row[at.col + 1].value, separator);

    let mut targets: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    targets.entry(at.row).or_default().push(at.col);
    if propagate {
        for idx in other_merged_pairs(grid, &merged) {
            if idx != at {
                targets.entry(idx.row).or_default().push(idx.col);
            }
        }
    }

    let mut values = grid.values();
    let mut diagnostics = Vec::new();
    for (row, mut cols) in targets {
        // The requested cell always wins over propagated merges overlapping it.
        let mut accepted: Vec<usize> = if row == at.row { vec![at.col] } else { Vec::new() };
        cols.sort_unstable();
        cols.dedup();
        for col in cols {
            if accepted.contains(&col) {
                continue;
            }
            if accepted.iter().all(|&kept| kept.abs_diff(col) > 1) {
                accepted.push(col);
            } else {
                diagnostics.push(
                    Diagnostic::debug("overlapping-merge", "propagated merge overlaps another")
                        .with_context("cell", CellIdx::new(row, col).to_string())
                        .emit(),
                );
            }
        }
        accepted.sort_unstable_by(|a, b| b.cmp(a));
        for col in accepted {
            merge_in_row(&mut values[row], col, separator);
        }
    }

    MutationOutcome::rebuilt(grid, values, diagnostics)
}

/// Joins column `col` with column `col + 1` in every row, removing one column.
pub fn merge_next_col(grid: &TokenGrid, col: usize) -> Result<MutationOutcome, AlignError> {
    if col >= grid.n_cols().saturating_sub(1) {
        return Ok(MutationOutcome::unchanged(
            grid,
            Diagnostic::debug("no-next-column", "next column does not exist; merge skipped")
                .with_context("col", col.to_string())
                .with_context("columns", grid.n_cols().to_string()),
        ));
    }

    let separator = grid.separator();
    let values = grid
        .values()
        .into_iter()
        .map(|mut row| {
            let right = row.remove(col + 1);
            row[col] = render_pair(&row[col], &right, separator);
            row
        })
        .collect();

    MutationOutcome::rebuilt(grid, values, Vec::new())
}

/// Slides the token at `at` one cell towards the nearest blank in `direction`.
///
/// Every cell between the token and that blank moves along with it and the token's
/// original cell becomes blank.
pub fn slide_token(
    grid: &TokenGrid,
    at: impl Into<CellIdx>,
    direction: Direction,
) -> Result<MutationOutcome, AlignError> {
    let at = grid.check(at.into())?;
    let Some(blank) = nearest_blank_unchecked(grid, at, direction) else {
        let row: Vec<&str> = grid.row(at.row).iter().map(|t| t.value.as_str()).collect();
        return Ok(MutationOutcome::unchanged(
            grid,
            Diagnostic::debug("no-room", "no empty cell to slide into")
                .with_context("cell", at.to_string())
                .with_context("direction", direction.to_string())
                .with_context("row", format!("{row:?}")),
        ));
    };

    let mut values = grid.values();
    let row = &mut values[at.row];
    match direction {
        Direction::Right => row[at.col..=blank].rotate_right(1),
        Direction::Left => row[blank..=at.col].rotate_left(1),
    }

    MutationOutcome::rebuilt(grid, values, Vec::new())
}

/// Removes column `col` from every row.
pub fn drop_col(grid: &TokenGrid, col: usize) -> Result<MutationOutcome, AlignError> {
    let col = grid.check_col(col)?;
    if grid.n_cols() == 1 {
        return Err(AlignError::InvalidArgument(
            ErrorInfo::new("last-column", "cannot drop the only column of a grid")
                .with_context("col", col.to_string()),
        ));
    }
    let values = grid
        .values()
        .into_iter()
        .map(|mut row| {
            row.remove(col);
            row
        })
        .collect();
    MutationOutcome::rebuilt(grid, values, Vec::new())
}
