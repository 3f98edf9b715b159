//! Cache keys.

use std::fmt;

use eqcache_engine::OutputMode;
use serde::{Deserialize, Serialize};

/// Normalized identity of a rendered expression.
///
/// The key is the entity-decoded source followed by the inline flag
/// (`true`/`false`) and, for HTML output, the suffix `html`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Computes the key for an expression.
    pub fn new(tex: &str, inline: bool, mode: OutputMode) -> Self {
        let mut key = html_escape::decode_html_entities(tex).into_owned();
        key.push_str(if inline { "true" } else { "false" });
        if mode == OutputMode::Html {
            key.push_str("html");
        }
        Self(key)
    }

    /// Returns the key as stored in the cache file.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
