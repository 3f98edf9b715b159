//! Engine error types.

use thiserror::Error;

/// Errors that can occur while starting or calling the typesetting engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine could not be started.
    #[error("Failed to start engine: {0}")]
    LaunchError(String),

    /// The engine rejected or failed to render an expression.
    #[error("Render failed: {0}")]
    RenderError(String),

    /// The engine did not answer in time.
    #[error("Render timed out after {0} ms")]
    Timeout(u64),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Creates a launch error.
    pub fn launch(message: impl Into<String>) -> Self {
        Self::LaunchError(message.into())
    }

    /// Creates a render error.
    pub fn render(message: impl Into<String>) -> Self {
        Self::RenderError(message.into())
    }
}
