//! Diagnostics attached to mutation results.
//!
//! No-op and rejected operations are not errors. They are reported back to the caller as
//! [`Diagnostic`] records and mirrored to `tracing`, which stays silent unless the embedding
//! application installs a subscriber.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::errors::write_context;

/// Severity of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    /// Informational note, typically a boundary no-op.
    Debug,
    /// A requested change was refused.
    Warning,
}

/// A single diagnostic entry produced while evaluating or adopting a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity of the entry.
    pub level: DiagnosticLevel,
    /// Stable machine readable code.
    pub code: String,
    /// Human readable description.
    pub message: String,
    /// Contextual key value pairs.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
}

impl Diagnostic {
    /// Creates a debug level diagnostic.
    pub fn debug(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Debug, code, message)
    }

    /// Creates a warning level diagnostic.
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warning, code, message)
    }

    fn new(level: DiagnosticLevel, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
        }
    }

    /// Adds a context entry to the diagnostic.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Forwards the diagnostic to `tracing` and returns it unchanged.
    pub fn emit(self) -> Self {
        match self.level {
            DiagnosticLevel::Debug => tracing::debug!(code = %self.code, "{}", self),
            DiagnosticLevel::Warning => tracing::warn!(code = %self.code, "{}", self),
        }
        self
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        write_context(f, &self.context)
    }
}
