//! Resolver error types.

use thiserror::Error;

/// Errors surfaced to callers of the resolver.
///
/// Render failures are not among them: a failed render is logged and
/// replaced by empty markup.
#[derive(Debug, Error)]
pub enum EquationError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Store error.
    #[error("Cache error: {0}")]
    Store(#[from] eqcache_store::StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EquationError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
