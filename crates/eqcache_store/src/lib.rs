//! # eqcache_store
//!
//! Persistent storage for rendered equations.
//!
//! ## Cache Strategy
//!
//! 1. **Normalized keys**: HTML entities in the source are decoded, so
//!    `a &lt; b` and `a < b` share one entry
//! 2. **Mode-aware**: inline and display math, SVG and HTML output are
//!    cached separately
//! 3. **Write-once per build**: the file is only rewritten when new entries
//!    were added since the last flush
//!
//! ## Storage
//!
//! The store is a single JSON object mapping cache keys to markup, so it can
//! be inspected and edited by hand.

mod error;
mod key;
mod store;

pub use error::StoreError;
pub use key::CacheKey;
pub use store::{DEFAULT_CACHE_FILE, EquationStore};
