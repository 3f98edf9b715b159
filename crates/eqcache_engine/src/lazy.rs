//! Lazily started engine handle.

use tokio::sync::OnceCell;
use tracing::info;

use crate::{EngineError, EngineLauncher, OutputMode};

/// One shared engine per output mode, started on first use.
///
/// Concurrent first calls for the same mode wait on a single launch. A
/// failed launch leaves the slot empty, so a later call tries again.
pub struct LazyEngine<L: EngineLauncher> {
    launcher: L,
    svg: OnceCell<L::Engine>,
    html: OnceCell<L::Engine>,
}

impl<L: EngineLauncher> LazyEngine<L> {
    /// Creates a handle that has not started any engine yet.
    pub fn new(launcher: L) -> Self {
        Self {
            launcher,
            svg: OnceCell::new(),
            html: OnceCell::new(),
        }
    }

    /// Returns the launcher.
    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Returns the engine for `mode`, starting it if needed.
    pub async fn get(&self, mode: OutputMode) -> Result<&L::Engine, EngineError> {
        self.slot(mode)
            .get_or_try_init(|| async move {
                info!("Starting math engine ({})", mode);
                self.launcher.launch(mode).await
            })
            .await
    }

    /// Returns whether the engine for `mode` has been started.
    pub fn is_started(&self, mode: OutputMode) -> bool {
        self.slot(mode).initialized()
    }

    fn slot(&self, mode: OutputMode) -> &OnceCell<L::Engine> {
        match mode {
            OutputMode::Svg => &self.svg,
            OutputMode::Html => &self.html,
        }
    }
}
