//! Engine abstraction.
//!
//! This module provides the `MathEngine` and `EngineLauncher` traits which
//! abstract the typesetting backend, allowing the cache to run against the
//! MathJax command-line tools in production and an in-process spy in tests.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{EngineError, OutputMode};

/// Web font location handed to the CommonHTML output.
pub const DEFAULT_FONT_URL: &str =
    "https://cdn.jsdelivr.net/npm/mathjax@3.1.0/es5/output/chtml/fonts/woff-v2";

/// Options for configuring the engine at launch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Program to run. Defaults to the MathJax tool for the output mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    /// Extra arguments passed before the expression.
    pub args: Vec<String>,
    /// TeX packages to load. Empty keeps the engine's full default set.
    pub packages: Vec<String>,
    /// Font URL for HTML output.
    pub font_url: String,
    /// Per-render timeout in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            program: None,
            args: Vec::new(),
            packages: Vec::new(),
            font_url: DEFAULT_FONT_URL.to_string(),
            timeout_ms: None,
        }
    }
}

impl EngineOptions {
    /// Returns the program to run for `mode`.
    pub fn program_for(&self, mode: OutputMode) -> &str {
        self.program
            .as_deref()
            .unwrap_or_else(|| mode.default_program())
    }

    /// Returns the per-render timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// A started typesetting engine.
pub trait MathEngine: Send + Sync {
    /// Renders a single expression.
    ///
    /// # Arguments
    ///
    /// * `tex` - The TeX source, without delimiters
    /// * `display` - `true` for block (display) math, `false` for inline math
    ///
    /// # Returns
    ///
    /// The raw engine output: an SVG document or an HTML fragment.
    fn render(
        &self,
        tex: &str,
        display: bool,
    ) -> impl Future<Output = Result<String, EngineError>> + Send;
}

/// Starts engines on demand.
///
/// A launcher is cheap to hold; `launch` does the expensive part and is
/// called at most once per output mode by `LazyEngine`.
pub trait EngineLauncher: Send + Sync {
    /// The engine this launcher produces.
    type Engine: MathEngine;

    /// Starts an engine configured for `mode`.
    fn launch(
        &self,
        mode: OutputMode,
    ) -> impl Future<Output = Result<Self::Engine, EngineError>> + Send;
}
