//! # eqcache_engine
//!
//! The seam between eqcache and the external math typesetting engine.
//!
//! This crate provides:
//! - The `MathEngine` / `EngineLauncher` traits the cache renders through
//! - `LazyEngine`, a one-time initialized engine handle per output mode
//! - `CommandLauncher`, which drives the MathJax command-line tools
//!
//! ## Architecture
//!
//! Starting an engine is expensive, rendering with a started engine is
//! cheap. The two steps are split so the cache can defer the start until
//! the first cache miss and then reuse the engine for every later render:
//!
//! ```rust,ignore
//! use eqcache_engine::{CommandLauncher, EngineOptions, LazyEngine, MathEngine, OutputMode};
//!
//! let engine = LazyEngine::new(CommandLauncher::new(EngineOptions::default()));
//! let svg = engine.get(OutputMode::Svg).await?.render("x^2", false).await?;
//! ```
//!
//! ## Features
//!
//! - `test-utils`: Enable `SpyLauncher`, an in-process engine that counts
//!   launches and renders.

mod command;
mod engine;
mod error;
mod lazy;
mod mode;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use command::{CommandEngine, CommandLauncher};
pub use engine::{DEFAULT_FONT_URL, EngineLauncher, EngineOptions, MathEngine};
pub use error::EngineError;
pub use lazy::LazyEngine;
pub use mode::{OutputMode, ParseOutputModeError};
