use std::collections::BTreeMap;

use delimitless_core::errors::{AlignError, ErrorInfo};
use delimitless_core::CellIdx;

use crate::tension::settled_tension;
use crate::tokenize::{pad_rows, tokenize};

/// Separator used to join merged cells unless configured otherwise.
pub const DEFAULT_SEPARATOR: char = '-';

/// A single grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Row index of the cell.
    pub row: usize,
    /// Column index of the cell.
    pub col: usize,
    /// Token text; empty for padding.
    pub value: String,
    /// Directional pull towards equal-valued tokens (negative is left).
    pub tension: f64,
}

impl Token {
    /// Returns the position of the token.
    pub fn idx(&self) -> CellIdx {
        CellIdx::new(self.row, self.col)
    }

    /// Returns true for padding cells.
    pub fn is_blank(&self) -> bool {
        self.value.is_empty()
    }
}

impl From<&Token> for CellIdx {
    fn from(token: &Token) -> Self {
        token.idx()
    }
}

/// Rectangular grid of [`Token`]s, one row per input string.
///
/// A grid is immutable once built: every structural operation derives a new grid via
/// [`TokenGrid::from_values`], which re-pads rows and recomputes tensions and the value index.
#[derive(Debug, Clone)]
pub struct TokenGrid {
    n_rows: usize,
    n_cols: usize,
    separator: char,
    cells: Vec<Token>,
    index: BTreeMap<String, Vec<CellIdx>>,
}

impl TokenGrid {
    /// Tokenizes `items` into a grid joined with [`DEFAULT_SEPARATOR`].
    pub fn from_strings<S: AsRef<str>>(items: &[S]) -> Result<Self, AlignError> {
        Self::from_strings_with(items, DEFAULT_SEPARATOR)
    }

    /// Tokenizes `items` into a grid whose merges use `separator`.
    pub fn from_strings_with<S: AsRef<str>>(
        items: &[S],
        separator: char,
    ) -> Result<Self, AlignError> {
        Self::from_values(tokenize(items)?, separator)
    }

    /// Builds a grid from an explicit value matrix, padding ragged rows.
    pub fn from_values(mut values: Vec<Vec<String>>, separator: char) -> Result<Self, AlignError> {
        if values.is_empty() {
            return Err(AlignError::EmptyInput(ErrorInfo::new(
                "empty-input",
                "a grid needs at least one row",
            )));
        }
        let n_cols = pad_rows(&mut values);
        if n_cols == 0 {
            return Err(AlignError::InvalidArgument(ErrorInfo::new(
                "no-columns",
                "every row is empty",
            )));
        }
        let n_rows = values.len();

        let mut cells = Vec::with_capacity(n_rows * n_cols);
        let mut index: BTreeMap<String, Vec<CellIdx>> = BTreeMap::new();
        for (row, row_values) in values.into_iter().enumerate() {
            for (col, value) in row_values.into_iter().enumerate() {
                index
                    .entry(value.clone())
                    .or_default()
                    .push(CellIdx::new(row, col));
                cells.push(Token {
                    row,
                    col,
                    value,
                    tension: 0.0,
                });
            }
        }

        let mut grid = Self {
            n_rows,
            n_cols,
            separator,
            cells,
            index,
        };
        let tensions: Vec<f64> = grid
            .cells
            .iter()
            .map(|token| settled_tension(&grid, token.idx()))
            .collect();
        for (token, tension) in grid.cells.iter_mut().zip(tensions) {
            token.tension = tension;
        }
        Ok(grid)
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Returns `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Separator used when merging cells of this grid.
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Returns the token at `at`, if it exists.
    pub fn get(&self, at: CellIdx) -> Option<&Token> {
        if at.row < self.n_rows && at.col < self.n_cols {
            self.cells.get(at.row * self.n_cols + at.col)
        } else {
            None
        }
    }

    /// Returns the token at `at` or an out-of-range error.
    pub fn token(&self, at: CellIdx) -> Result<&Token, AlignError> {
        self.get(at).ok_or_else(|| self.out_of_range(at))
    }

    /// Returns the value stored at `at`.
    pub fn value(&self, at: CellIdx) -> Option<&str> {
        self.get(at).map(|token| token.value.as_str())
    }

    /// Validates that `at` lies inside the grid.
    pub fn check(&self, at: CellIdx) -> Result<CellIdx, AlignError> {
        self.token(at).map(Token::idx)
    }

    /// Validates that `col` is a column of the grid.
    pub fn check_col(&self, col: usize) -> Result<usize, AlignError> {
        if col < self.n_cols {
            Ok(col)
        } else {
            Err(AlignError::InvalidArgument(
                ErrorInfo::new("column-out-of-range", "column does not exist")
                    .with_context("col", col.to_string())
                    .with_context("columns", self.n_cols.to_string()),
            ))
        }
    }

    fn out_of_range(&self, at: CellIdx) -> AlignError {
        AlignError::InvalidArgument(
            ErrorInfo::new("cell-out-of-range", "cell lies outside the grid")
                .with_context("cell", at.to_string())
                .with_context("shape", format!("{}x{}", self.n_rows, self.n_cols)),
        )
    }

    /// Tokens of an already validated row.
    pub(crate) fn row(&self, row: usize) -> &[Token] {
        let start = row * self.n_cols;
        &self.cells[start..start + self.n_cols]
    }

    /// Iterates over rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[Token]> + '_ {
        self.cells.chunks(self.n_cols)
    }

    /// Iterates over all tokens in row-major order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> + '_ {
        self.cells.iter()
    }

    /// Returns the values of column `col`, top to bottom.
    pub fn column_values(&self, col: usize) -> Result<Vec<&str>, AlignError> {
        let col = self.check_col(col)?;
        Ok(self
            .rows()
            .map(|row| row[col].value.as_str())
            .collect())
    }

    /// Returns the plain value matrix.
    pub fn values(&self) -> Vec<Vec<String>> {
        self.rows()
            .map(|row| row.iter().map(|token| token.value.clone()).collect())
            .collect()
    }

    /// Returns every position holding `value`, in row-major order.
    pub fn positions_of(&self, value: &str) -> &[CellIdx] {
        self.index.get(value).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the positions sharing the value at `at`, excluding `at` itself.
    pub fn matching_positions(&self, at: CellIdx) -> Result<Vec<CellIdx>, AlignError> {
        let token = self.token(at)?;
        Ok(self
            .positions_of(&token.value)
            .iter()
            .copied()
            .filter(|idx| *idx != at)
            .collect())
    }

    /// Returns true when every row holds the same value in `col`.
    pub fn is_uniform_column(&self, col: usize) -> bool {
        if col >= self.n_cols {
            return false;
        }
        let first = &self.cells[col].value;
        self.rows().all(|row| &row[col].value == first)
    }

    /// Returns the indices of all uniform columns.
    pub fn uniform_columns(&self) -> Vec<usize> {
        (0..self.n_cols)
            .filter(|&col| self.is_uniform_column(col))
            .collect()
    }
}

impl PartialEq for TokenGrid {
    fn eq(&self, other: &Self) -> bool {
        self.separator == other.separator
            && self.shape() == other.shape()
            && self
                .cells
                .iter()
                .zip(&other.cells)
                .all(|(a, b)| a.value == b.value)
    }
}
