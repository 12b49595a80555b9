use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{AlignError, ErrorInfo};

/// Position of a cell within a token grid, ordered row-major.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct CellIdx {
    /// Row index (one row per input string).
    pub row: usize,
    /// Column index within the row.
    pub col: usize,
}

impl CellIdx {
    /// Creates a new cell position.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for CellIdx {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Horizontal direction along a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards column zero.
    Left,
    /// Towards the last column.
    Right,
}

impl Direction {
    /// Resolves a direction from a textual label, falling back to boolean flags when the
    /// label is empty.
    ///
    /// Accepted labels are `l`, `left`, `r` and `right` (case insensitive). An empty label
    /// with neither flag set, or any other label, is an [`AlignError::InvalidArgument`].
    pub fn resolve(direction: &str, left: bool, right: bool) -> Result<Self, AlignError> {
        let label = direction.trim().to_ascii_lowercase();
        match label.as_str() {
            "l" | "left" => Ok(Direction::Left),
            "r" | "right" => Ok(Direction::Right),
            "" if left => Ok(Direction::Left),
            "" if right => Ok(Direction::Right),
            _ => Err(AlignError::InvalidArgument(
                ErrorInfo::new("invalid-direction", "direction must be left or right")
                    .with_context("direction", direction)
                    .with_hint("pass \"l\"/\"r\" or set exactly one of the left/right flags"),
            )),
        }
    }

    /// Returns the opposite direction.
    pub fn flip(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl FromStr for Direction {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::resolve(s, false, false)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}
