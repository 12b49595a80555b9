#![deny(missing_docs)]
#![doc = "Aligns ragged tokenized strings into a table by merging and sliding tokens to lower column entropy."]

//! Build a [`TokenArray`] from a batch of strings, inspect entropy and tension, then
//! evaluate or apply structural mutations. In-place mutations pass through a guard that
//! refuses to alter columns whose values are already uniform.

/// Owning array, adoption and the frozen-column guard.
pub mod array;
/// Shannon entropy metrics and the merge-delta matrix.
pub mod entropy;
/// Token and grid types.
pub mod grid;
/// Canonical content hashing for grids.
pub mod hash;
/// Pure structural mutations.
pub mod mutate;
/// Alignment options.
pub mod params;
/// Snapshot reports.
pub mod report;
/// Serde helpers for JSON artefacts.
#[path = "serde.rs"]
pub mod serde_io;
/// Tension, room and compression scoring.
pub mod tension;
/// Regex tokenizer.
pub mod tokenize;

pub use array::{Adoption, AdoptionStatus, TokenArray};
pub use entropy::{
    column_entropies, diff_entropy, entropy_of_col, entropy_per_merge, total_entropy, MergeDeltas,
};
pub use grid::{Token, TokenGrid, DEFAULT_SEPARATOR};
pub use hash::canonical_hash;
pub use mutate::{
    drop_col, merge_next_cell, merge_next_col, other_merged_pairs, slide_token, MutationOutcome,
};
pub use params::GridOpts;
pub use report::AlignmentReport;
pub use tension::{
    compression_force, compression_force_with, connection_tension, has_room, has_room_left,
    has_room_right, nearest_blank, raw_tension, CompressionForce,
};
pub use tokenize::{split_tokens, tokenize};

pub use delimitless_core::{AlignError, CellIdx, Diagnostic, DiagnosticLevel, Direction};
