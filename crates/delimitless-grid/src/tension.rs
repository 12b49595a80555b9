use delimitless_core::errors::{AlignError, ErrorInfo};
use delimitless_core::{CellIdx, Direction};
use serde::{Deserialize, Serialize};

use crate::entropy::{entropy_per_merge, MergeDeltas};
use crate::grid::TokenGrid;

/// Best available compression on either side of a token that cannot slide.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompressionForce {
    /// Magnitude of the best entropy reduction from merges left of the token.
    pub left: f64,
    /// Magnitude of the best entropy reduction from merges right of the token.
    pub right: f64,
    /// Merge columns achieving the left optimum, if any.
    pub left_merge_cols: Option<Vec<usize>>,
    /// Merge columns achieving the right optimum, if any.
    pub right_merge_cols: Option<Vec<usize>>,
}

/// Returns true when the row of `at` holds an empty cell strictly on the `direction` side.
pub fn has_room(grid: &TokenGrid, at: CellIdx, direction: Direction) -> Result<bool, AlignError> {
    let at = grid.check(at)?;
    Ok(nearest_blank_unchecked(grid, at, direction).is_some())
}

/// Shorthand for [`has_room`] towards the left.
pub fn has_room_left(grid: &TokenGrid, at: CellIdx) -> Result<bool, AlignError> {
    has_room(grid, at, Direction::Left)
}

/// Shorthand for [`has_room`] towards the right.
pub fn has_room_right(grid: &TokenGrid, at: CellIdx) -> Result<bool, AlignError> {
    has_room(grid, at, Direction::Right)
}

/// Returns the absolute column of the closest empty cell on the `direction` side of `at`.
pub fn nearest_blank(
    grid: &TokenGrid,
    at: CellIdx,
    direction: Direction,
) -> Result<Option<usize>, AlignError> {
    let at = grid.check(at)?;
    Ok(nearest_blank_unchecked(grid, at, direction))
}

pub(crate) fn nearest_blank_unchecked(
    grid: &TokenGrid,
    at: CellIdx,
    direction: Direction,
) -> Option<usize> {
    let row = grid.row(at.row);
    match direction {
        Direction::Right => row[at.col + 1..]
            .iter()
            .position(|token| token.is_blank())
            .map(|offset| at.col + 1 + offset),
        Direction::Left => row[..at.col].iter().rposition(|token| token.is_blank()),
    }
}

/// Mean column offset from `at` to every other token with the same value.
///
/// Returns zero when the value occurs nowhere else.
pub fn raw_tension(grid: &TokenGrid, at: CellIdx) -> Result<f64, AlignError> {
    let at = grid.check(at)?;
    Ok(raw_tension_unchecked(grid, at))
}

fn raw_tension_unchecked(grid: &TokenGrid, at: CellIdx) -> f64 {
    let value = grid.value(at).unwrap_or_default();
    let (sum, count) = grid
        .positions_of(value)
        .iter()
        .filter(|idx| **idx != at)
        .fold((0.0_f64, 0_usize), |(sum, count), idx| {
            (sum + idx.col as f64 - at.col as f64, count + 1)
        });
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Raw tension with the pull cancelled when the row has no room in that direction.
pub(crate) fn settled_tension(grid: &TokenGrid, at: CellIdx) -> f64 {
    let raw = raw_tension_unchecked(grid, at);
    let direction = if raw > 0.0 {
        Direction::Right
    } else if raw < 0.0 {
        Direction::Left
    } else {
        return 0.0;
    };
    if nearest_blank_unchecked(grid, at, direction).is_some() {
        raw
    } else {
        0.0
    }
}

/// Tension of `at` normalised by the grid width and scaled by `k`.
///
/// Unlike [`crate::Token::tension`] this ignores whether the token has room to move.
pub fn connection_tension(grid: &TokenGrid, at: CellIdx, k: f64) -> Result<f64, AlignError> {
    Ok(k * raw_tension(grid, at)? / grid.n_cols() as f64)
}

/// Scores the merges next to `at` when it has no room to slide.
pub fn compression_force(
    grid: &TokenGrid,
    at: CellIdx,
    k: f64,
) -> Result<CompressionForce, AlignError> {
    let deltas = entropy_per_merge(grid)?;
    compression_force_with(grid, &deltas, at, k)
}

/// [`compression_force`] against a precomputed merge-delta matrix for `grid`.
pub fn compression_force_with(
    grid: &TokenGrid,
    deltas: &MergeDeltas,
    at: CellIdx,
    k: f64,
) -> Result<CompressionForce, AlignError> {
    let at = grid.check(at)?;
    let same_shape = deltas.n_rows() == grid.n_rows()
        && deltas.n_merges() == grid.n_cols().saturating_sub(1);
    let Some(merges) = deltas.row(at.row).filter(|_| same_shape) else {
        return Err(AlignError::InvalidArgument(
            ErrorInfo::new("deltas-shape-mismatch", "merge deltas were computed for another grid")
                .with_context("deltas", format!("{}x{}", deltas.n_rows(), deltas.n_merges()))
                .with_context("grid", format!("{}x{}", grid.n_rows(), grid.n_cols())),
        ));
    };
    let mut force = CompressionForce::default();

    if nearest_blank_unchecked(grid, at, Direction::Right).is_none() {
        let start = at.col.min(merges.len());
        if let Some((magnitude, cols)) = best_compression(&merges[start..], start) {
            force.right = k * magnitude;
            force.right_merge_cols = Some(cols);
        }
    }

    if nearest_blank_unchecked(grid, at, Direction::Left).is_none() {
        let end = at.col.min(merges.len());
        if let Some((magnitude, cols)) = best_compression(&merges[..end], 0) {
            force.left = k * magnitude;
            force.left_merge_cols = Some(cols);
        }
    }

    Ok(force)
}

/// Picks every merge tied for the most negative delta; `None` when nothing reduces entropy.
fn best_compression(deltas: &[f64], offset: usize) -> Option<(f64, Vec<usize>)> {
    let best = deltas.iter().copied().fold(f64::INFINITY, f64::min);
    if best >= 0.0 {
        return None;
    }
    let cols: Vec<usize> = deltas
        .iter()
        .enumerate()
        .filter(|(_, delta)| **delta == best)
        .map(|(col, _)| col + offset)
        .collect();
    Some((best.abs() * cols.len() as f64, cols))
}
