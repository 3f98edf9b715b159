//! Runtime setup shared by the commands

use miette::{IntoDiagnostic, Result};
use tokio::runtime::Runtime;

/// Builds the runtime a command drives the cache on.
///
/// A command renders at most one expression, so a single thread is enough.
pub fn build_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .enable_time()
        .build()
        .into_diagnostic()
}
