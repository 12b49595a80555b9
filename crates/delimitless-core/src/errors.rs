//! Structured error types shared across delimitless crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`AlignError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (positions, sizes, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for token alignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum AlignError {
    /// No input rows were supplied, so no grid shape can be derived.
    #[error("empty input: {0}")]
    EmptyInput(ErrorInfo),
    /// A caller supplied argument is out of range or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// Filesystem errors raised while loading configuration.
    #[error("io error: {0}")]
    Io(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.message, self.code)?;
        write_context(f, &self.context)?;
        match &self.hint {
            Some(hint) => write!(f, " (hint: {hint})"),
            None => Ok(()),
        }
    }
}

/// Appends ` key=value` pairs in key order.
pub(crate) fn write_context(
    f: &mut fmt::Formatter<'_>,
    context: &BTreeMap<String, String>,
) -> fmt::Result {
    context
        .iter()
        .try_for_each(|(key, value)| write!(f, " {key}={value}"))
}

impl AlignError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            AlignError::EmptyInput(info)
            | AlignError::InvalidArgument(info)
            | AlignError::Serde(info)
            | AlignError::Io(info) => info,
        }
    }

    /// Shorthand for an [`AlignError::InvalidArgument`] with the given code.
    pub fn invalid(code: impl Into<String>, message: impl Into<String>) -> Self {
        AlignError::InvalidArgument(ErrorInfo::new(code, message))
    }

    /// Appends a context entry to the payload of any variant.
    pub fn with_context(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            AlignError::EmptyInput(info) => AlignError::EmptyInput(info.with_context(key, value)),
            AlignError::InvalidArgument(info) => {
                AlignError::InvalidArgument(info.with_context(key, value))
            }
            AlignError::Serde(info) => AlignError::Serde(info.with_context(key, value)),
            AlignError::Io(info) => AlignError::Io(info.with_context(key, value)),
        }
    }
}
