use std::sync::OnceLock;

use delimitless_core::errors::{AlignError, ErrorInfo};
use regex::Regex;

/// Pattern splitting a string into alphabetic and numeric runs.
pub const TOKEN_PATTERN: &str = "[a-zA-Z]+|[0-9]+";

fn token_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("token pattern is a valid regex"))
}

/// Splits a single string into its alphabetic and numeric runs, in order of appearance.
///
/// Every character outside `[a-zA-Z0-9]` acts as a separator and is dropped.
pub fn split_tokens(item: &str) -> Vec<String> {
    token_regex()
        .find_iter(item)
        .map(|m| m.as_str().to_owned())
        .collect()
}

/// Tokenizes `items` into a rectangular matrix of values, one row per item.
///
/// Rows shorter than the longest are right-padded with empty strings.
pub fn tokenize<S: AsRef<str>>(items: &[S]) -> Result<Vec<Vec<String>>, AlignError> {
    if items.is_empty() {
        return Err(AlignError::EmptyInput(
            ErrorInfo::new("empty-input", "cannot derive a token count without any input rows")
                .with_hint("pass at least one string"),
        ));
    }

    let mut rows = Vec::with_capacity(items.len());
    for (row, item) in items.iter().enumerate() {
        let tokens = split_tokens(item.as_ref());
        if tokens.is_empty() {
            return Err(AlignError::InvalidArgument(
                ErrorInfo::new("no-tokens", "input string contains no alphabetic or numeric runs")
                    .with_context("row", row.to_string())
                    .with_context("item", item.as_ref()),
            ));
        }
        rows.push(tokens);
    }

    pad_rows(&mut rows);
    Ok(rows)
}

/// Right-pads every row with empty strings up to the longest row and returns that width.
pub(crate) fn pad_rows(rows: &mut [Vec<String>]) -> usize {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in rows.iter_mut() {
        row.resize(width, String::new());
    }
    width
}
