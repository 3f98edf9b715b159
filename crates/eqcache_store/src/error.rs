//! Store error types.

use thiserror::Error;

/// Errors that can occur while persisting the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No cache location could be determined.
    #[error("Cache location could not be resolved: {0}")]
    Location(String),
}

impl StoreError {
    /// Creates a location error.
    pub fn location(message: impl Into<String>) -> Self {
        Self::Location(message.into())
    }
}
