//! The persistent key to markup map.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{CacheKey, StoreError};

/// File name of the default cache, placed in the user's home directory.
pub const DEFAULT_CACHE_FILE: &str = ".mathjax-cache";

/// Rendered equations, backed by a JSON file.
///
/// Entries are only ever added. The store remembers whether it changed
/// since it was loaded or last persisted, so a build that renders nothing
/// new leaves the file untouched.
#[derive(Debug)]
pub struct EquationStore {
    /// File the store is loaded from and persisted to.
    path: PathBuf,
    /// Cache key to rendered markup.
    entries: HashMap<String, String>,
    /// Whether entries were added since the last persist.
    dirty: bool,
}

impl EquationStore {
    /// Creates an empty store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: HashMap::new(),
            dirty: false,
        }
    }

    /// Returns `~/.mathjax-cache`.
    pub fn default_path() -> Result<PathBuf, StoreError> {
        dirs::home_dir()
            .map(|home| home.join(DEFAULT_CACHE_FILE))
            .ok_or_else(|| StoreError::location("home directory not found"))
    }

    /// Loads the store from `path`.
    ///
    /// A missing, unreadable or corrupted file yields an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let mut store = Self::new(path);

        let content = match fs::read_to_string(&store.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No equation cache found at {}", store.path.display());
                return store;
            }
            Err(e) => {
                warn!(
                    "Ignoring unreadable equation cache {}: {}",
                    store.path.display(),
                    e
                );
                return store;
            }
        };

        match serde_json::from_str::<HashMap<String, String>>(&content) {
            Ok(entries) => {
                debug!(
                    "Loaded {} cached equations from {}",
                    entries.len(),
                    store.path.display()
                );
                store.entries = entries;
            }
            Err(e) => {
                warn!(
                    "Ignoring corrupted equation cache {}: {}",
                    store.path.display(),
                    e
                );
            }
        }

        store
    }

    /// Returns the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the markup cached under `key`.
    pub fn get(&self, key: &CacheKey) -> Option<&str> {
        self.entries.get(key.as_str()).map(String::as_str)
    }

    /// Returns whether `key` has an entry.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key.as_str())
    }

    /// Stores markup under `key` and marks the store dirty.
    pub fn insert(&mut self, key: CacheKey, markup: impl Into<String>) {
        self.entries.insert(key.to_string(), markup.into());
        self.dirty = true;
    }

    /// Returns whether entries were added since the last persist.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marks the store as having unpersisted changes.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Serializes the store if it is dirty and clears the dirty flag.
    ///
    /// Returns `None` when there is nothing to persist. Callers that fail
    /// to write the snapshot must call [`mark_dirty`](Self::mark_dirty).
    pub fn take_snapshot(&mut self) -> Result<Option<String>, StoreError> {
        if !self.dirty {
            return Ok(None);
        }
        let json = serde_json::to_string(&self.entries)?;
        self.dirty = false;
        Ok(Some(json))
    }

    /// Deletes the cache file at `path`.
    ///
    /// Returns whether a file was removed.
    pub fn remove_file(path: &Path) -> Result<bool, StoreError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Returns the number of cached equations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
