//! Output modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the engine produces for an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// A standalone SVG document.
    #[default]
    Svg,
    /// A CommonHTML fragment.
    Html,
}

impl OutputMode {
    /// Returns the lowercase name used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Svg => "svg",
            OutputMode::Html => "html",
        }
    }

    /// Returns the MathJax command-line tool for this mode.
    pub fn default_program(&self) -> &'static str {
        match self {
            OutputMode::Svg => "tex2svg",
            OutputMode::Html => "tex2chtml",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown output mode name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown output mode '{0}' (expected 'svg' or 'html')")]
pub struct ParseOutputModeError(String);

impl FromStr for OutputMode {
    type Err = ParseOutputModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(OutputMode::Svg),
            "html" | "chtml" => Ok(OutputMode::Html),
            _ => Err(ParseOutputModeError(s.to_string())),
        }
    }
}
