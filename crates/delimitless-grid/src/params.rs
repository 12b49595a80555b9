use std::fs;
use std::path::Path;

use delimitless_core::errors::{AlignError, ErrorInfo};
use serde::{Deserialize, Serialize};

use crate::grid::DEFAULT_SEPARATOR;

/// YAML-configurable options for a [`TokenArray`](crate::TokenArray).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridOpts {
    /// Character joining merged cells.
    #[serde(default = "default_separator")]
    pub separator: char,
    /// Whether single-cell merges also merge equal pairs elsewhere in the grid.
    #[serde(default = "default_true")]
    pub propagate_merges: bool,
    /// Gain applied to connection tension.
    #[serde(default = "default_gain")]
    pub tension_gain: f64,
    /// Gain applied to compression force.
    #[serde(default = "default_gain")]
    pub compression_gain: f64,
}

fn default_separator() -> char {
    DEFAULT_SEPARATOR
}

fn default_true() -> bool {
    true
}

fn default_gain() -> f64 {
    1.0
}

impl Default for GridOpts {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            propagate_merges: true,
            tension_gain: 1.0,
            compression_gain: 1.0,
        }
    }
}

impl GridOpts {
    /// Returns a copy with a printable separator and finite gains.
    pub fn sanitised(&self) -> Self {
        let separator = if self.separator.is_control() || self.separator.is_whitespace() {
            DEFAULT_SEPARATOR
        } else {
            self.separator
        };
        let finite_or_default = |gain: f64| if gain.is_finite() { gain } else { 1.0 };
        Self {
            separator,
            propagate_merges: self.propagate_merges,
            tension_gain: finite_or_default(self.tension_gain),
            compression_gain: finite_or_default(self.compression_gain),
        }
    }

    /// Parses options from YAML text; omitted keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, AlignError> {
        let opts: GridOpts = serde_yaml::from_str(yaml).map_err(|err| {
            AlignError::Serde(ErrorInfo::new("opts-deserialize", err.to_string()))
        })?;
        Ok(opts.sanitised())
    }

    /// Reads options from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AlignError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            AlignError::Io(
                ErrorInfo::new("read-opts", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::from_yaml_str(&text)
    }

    /// Renders the options as YAML.
    pub fn to_yaml(&self) -> Result<String, AlignError> {
        serde_yaml::to_string(self)
            .map_err(|err| AlignError::Serde(ErrorInfo::new("opts-serialize", err.to_string())))
    }
}
