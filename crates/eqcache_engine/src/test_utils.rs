//! Test utilities for eqcache_engine.
//!
//! `SpyLauncher` renders in-process, records every launch and render, and
//! fails on request, so callers can assert exactly how often the engine was
//! reached.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::{EngineError, EngineLauncher, MathEngine, OutputMode};

#[derive(Default)]
struct SpyState {
    launches: AtomicUsize,
    renders: AtomicUsize,
    fail_launch: AtomicBool,
    failing: Mutex<HashSet<String>>,
    calls: Mutex<Vec<(String, bool)>>,
}

/// Launcher whose engines record their calls.
///
/// Clones share the same counters.
#[derive(Clone, Default)]
pub struct SpyLauncher {
    state: Arc<SpyState>,
}

impl SpyLauncher {
    /// Creates a spy with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes renders of `tex` fail with a parse error.
    pub fn fail_on(&self, tex: impl Into<String>) {
        self.state.failing.lock().insert(tex.into());
    }

    /// Makes every launch fail.
    pub fn fail_launch(&self) {
        self.state.fail_launch.store(true, Ordering::SeqCst);
    }

    /// Number of engines started.
    pub fn launch_count(&self) -> usize {
        self.state.launches.load(Ordering::SeqCst)
    }

    /// Number of render calls across all engines.
    pub fn render_count(&self) -> usize {
        self.state.renders.load(Ordering::SeqCst)
    }

    /// Every `(tex, display)` pair rendered, in call order.
    pub fn calls(&self) -> Vec<(String, bool)> {
        self.state.calls.lock().clone()
    }
}

impl EngineLauncher for SpyLauncher {
    type Engine = SpyEngine;

    async fn launch(&self, mode: OutputMode) -> Result<SpyEngine, EngineError> {
        self.state.launches.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_launch.load(Ordering::SeqCst) {
            return Err(EngineError::launch("spy engine refused to start"));
        }
        Ok(SpyEngine {
            mode,
            state: Arc::clone(&self.state),
        })
    }
}

/// Engine produced by `SpyLauncher`.
pub struct SpyEngine {
    mode: OutputMode,
    state: Arc<SpyState>,
}

impl MathEngine for SpyEngine {
    async fn render(&self, tex: &str, display: bool) -> Result<String, EngineError> {
        self.state.renders.fetch_add(1, Ordering::SeqCst);
        self.state.calls.lock().push((tex.to_string(), display));

        if self.state.failing.lock().contains(tex) {
            return Err(EngineError::render("Undefined control sequence"));
        }

        Ok(spy_markup(self.mode, tex, display))
    }
}

/// The raw markup `SpyEngine` returns for an expression.
pub fn spy_markup(mode: OutputMode, tex: &str, display: bool) -> String {
    match mode {
        OutputMode::Svg => format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" role="img" focusable="false" data-display="{}"><defs><path id="g0"></path></defs><g data-tex="{}"></g></svg>"#,
            display, tex
        ),
        OutputMode::Html => format!(
            r#"<mjx-container class="MathJax" jax="CHTML" display="{}"><mjx-math data-tex="{}"></mjx-math></mjx-container>"#,
            display, tex
        ),
    }
}
