#![deny(missing_docs)]
#![doc = "Core error, diagnostic and position types shared by the delimitless crates."]

pub mod diagnostics;
pub mod errors;
pub mod provenance;
mod types;

pub use diagnostics::{Diagnostic, DiagnosticLevel};
pub use errors::{AlignError, ErrorInfo};
pub use provenance::SchemaVersion;
pub use types::{CellIdx, Direction};
