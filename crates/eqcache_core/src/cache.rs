//! The equation cache shared by all documents of a build.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use eqcache_engine::{
    CommandLauncher, EngineError, EngineLauncher, LazyEngine, MathEngine, OutputMode,
};
use eqcache_store::{CacheKey, EquationStore};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::markup::{finish_html, finish_svg};
use crate::placeholder::{PlaceholderTable, find_placeholders};
use crate::{EquationError, ResolverConfig};

/// Renders equations through a persistent cache.
///
/// Documents go through two passes. While a document is assembled, every
/// equation is handed to [`make_placeholder`](Self::make_placeholder), which
/// returns either the cached markup or a placeholder token. Once the
/// document is complete, [`fill_placeholders`](Self::fill_placeholders)
/// renders the pending equations and splices the markup in. After the build,
/// [`flush`](Self::flush) persists new entries.
///
/// All methods take `&self`; share one cache between concurrently processed
/// documents with an `Arc`. The engine is started on the first cache miss
/// and reused afterwards.
pub struct EquationCache<L: EngineLauncher> {
    store: Mutex<EquationStore>,
    placeholders: Mutex<PlaceholderTable>,
    /// Keys that failed to render in this process and are not persisted.
    failures: Mutex<HashSet<CacheKey>>,
    engine: LazyEngine<L>,
    output: OutputMode,
    input_text: bool,
    persist_failures: bool,
}

impl EquationCache<CommandLauncher> {
    /// Creates a cache from configuration, loading the cache file and
    /// rendering through the configured command-line engine.
    pub fn from_config(config: &ResolverConfig) -> Result<Self, EquationError> {
        let store = EquationStore::load(config.cache_path()?);
        let launcher = CommandLauncher::new(config.engine.clone());
        Ok(Self::new(store, launcher).configure(config))
    }
}

impl<L: EngineLauncher> EquationCache<L> {
    /// Creates a cache over `store` that renders misses with engines from
    /// `launcher`.
    pub fn new(store: EquationStore, launcher: L) -> Self {
        Self {
            store: Mutex::new(store),
            placeholders: Mutex::new(PlaceholderTable::default()),
            failures: Mutex::new(HashSet::new()),
            engine: LazyEngine::new(launcher),
            output: OutputMode::default(),
            input_text: true,
            persist_failures: false,
        }
    }

    /// Applies the rendering options of `config`.
    pub fn configure(self, config: &ResolverConfig) -> Self {
        self.with_output(config.output)
            .with_input_text(config.input_text)
            .with_persist_failures(config.persist_failures)
    }

    /// Sets the output mode placeholders are keyed for.
    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    /// Sets whether HTML output carries its source in a hidden node.
    pub fn with_input_text(mut self, input_text: bool) -> Self {
        self.input_text = input_text;
        self
    }

    /// Sets whether failed renders are written to the cache file.
    pub fn with_persist_failures(mut self, persist_failures: bool) -> Self {
        self.persist_failures = persist_failures;
        self
    }

    /// Returns the output mode placeholders are keyed for.
    pub fn output(&self) -> OutputMode {
        self.output
    }

    /// Returns the engine launcher.
    pub fn launcher(&self) -> &L {
        self.engine.launcher()
    }

    /// Returns the cache file location.
    pub fn store_path(&self) -> PathBuf {
        self.store.lock().path().to_path_buf()
    }

    /// Returns the number of cached equations.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    /// Returns whether the cache has unpersisted entries.
    pub fn is_dirty(&self) -> bool {
        self.store.lock().is_dirty()
    }

    /// Returns the number of placeholders minted so far.
    pub fn placeholder_count(&self) -> usize {
        self.placeholders.lock().len()
    }

    /// Returns the known markup for an expression without rendering it.
    pub fn cached(&self, tex: &str, inline: bool, mode: OutputMode) -> Option<String> {
        self.lookup(&CacheKey::new(tex, inline, mode))
    }

    /// Returns the cached markup for an equation, or a placeholder token to
    /// embed in its place.
    ///
    /// The result can be embedded in document text as-is.
    pub fn make_placeholder(&self, tex: &str, inline: bool) -> String {
        if let Some(markup) = self.cached(tex, inline, self.output) {
            return markup;
        }

        let placeholder = self.placeholders.lock().mint(tex, inline);
        debug!("Deferred equation {} as {}", tex, placeholder);
        placeholder.to_string()
    }

    /// Replaces every placeholder in `doc` with rendered markup.
    ///
    /// Equations are rendered one after another in document order.
    /// Tokens this cache did not mint are left as they are.
    pub async fn fill_placeholders(&self, doc: &str, mode: OutputMode) -> String {
        let found = find_placeholders(doc);
        if found.is_empty() {
            return doc.to_string();
        }

        let mut out = String::with_capacity(doc.len());
        let mut last = 0;

        for (range, placeholder) in found {
            out.push_str(&doc[last..range.start]);

            let pending = self.placeholders.lock().get(placeholder).cloned();
            match pending {
                Some(equation) => {
                    let markup = self.render(&equation.tex, equation.inline, mode).await;
                    out.push_str(&markup);
                }
                None => {
                    debug!("Leaving unknown placeholder {} in place", placeholder);
                    out.push_str(&doc[range.clone()]);
                }
            }

            last = range.end;
        }

        out.push_str(&doc[last..]);
        out
    }

    /// Renders one equation, consulting the cache first.
    ///
    /// Never fails: when the engine cannot render the expression a warning
    /// is logged and the markup is empty.
    pub async fn render(&self, tex: &str, inline: bool, mode: OutputMode) -> String {
        let key = CacheKey::new(tex, inline, mode);
        if let Some(markup) = self.lookup(&key) {
            debug!("Equation cache hit: {}", key);
            return markup;
        }

        match self.typeset(tex, inline, mode).await {
            Ok(markup) => {
                self.store.lock().insert(key, markup.clone());
                markup
            }
            Err(e) => {
                warn!("Math render error: {} at \"{}\"", e, tex);
                self.record_failure(key);
                String::new()
            }
        }
    }

    /// Writes the cache file if new equations were cached.
    ///
    /// Returns whether the file was written.
    pub async fn flush(&self) -> Result<bool, EquationError> {
        let (path, json) = {
            let mut store = self.store.lock();
            match store.take_snapshot()? {
                Some(json) => (store.path().to_path_buf(), json),
                None => return Ok(false),
            }
        };

        if let Err(e) = write_cache_file(&path, &json).await {
            self.store.lock().mark_dirty();
            return Err(e);
        }

        info!(
            "Saved {} cached equations to {}",
            self.len(),
            path.display()
        );
        Ok(true)
    }

    fn lookup(&self, key: &CacheKey) -> Option<String> {
        if let Some(markup) = self.store.lock().get(key) {
            return Some(markup.to_string());
        }
        if self.failures.lock().contains(key) {
            return Some(String::new());
        }
        None
    }

    fn record_failure(&self, key: CacheKey) {
        if self.persist_failures {
            self.store.lock().insert(key, String::new());
        } else {
            self.failures.lock().insert(key);
        }
    }

    async fn typeset(
        &self,
        tex: &str,
        inline: bool,
        mode: OutputMode,
    ) -> Result<String, EngineError> {
        let engine = self.engine.get(mode).await?;
        let raw = engine.render(tex, !inline).await?;

        Ok(match mode {
            OutputMode::Svg => finish_svg(&raw, tex),
            OutputMode::Html if self.input_text => finish_html(&raw, tex, inline),
            OutputMode::Html => raw,
        })
    }
}

async fn write_cache_file(path: &Path, json: &str) -> Result<(), EquationError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, json).await?;
    Ok(())
}
