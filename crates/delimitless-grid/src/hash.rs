use sha2::{Digest, Sha256};

use crate::grid::TokenGrid;

/// Computes the canonical content hash of a grid's shape, separator and values.
///
/// Tensions are derived data and do not contribute.
pub fn canonical_hash(grid: &TokenGrid) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"delimitless-grid:v1");
    hasher.update((grid.n_rows() as u64).to_le_bytes());
    hasher.update((grid.n_cols() as u64).to_le_bytes());
    hasher.update((grid.separator() as u32).to_le_bytes());
    for token in grid.tokens() {
        hasher.update((token.value.len() as u64).to_le_bytes());
        hasher.update(token.value.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_depends_on_layout_not_concatenation() {
        let a = TokenGrid::from_strings(&["ab1"]).unwrap();
        let values = vec![vec!["a".to_string(), "b1".to_string()]];
        let b = TokenGrid::from_values(values, '-').unwrap();
        assert_ne!(canonical_hash(&a), canonical_hash(&b));
    }

    #[test]
    fn separator_contributes() {
        let dash = TokenGrid::from_strings_with(&["a1"], '-').unwrap();
        let dot = TokenGrid::from_strings_with(&["a1"], '.').unwrap();
        assert_ne!(canonical_hash(&dash), canonical_hash(&dot));
        assert_eq!(canonical_hash(&dash), canonical_hash(&dash.clone()));
    }
}
