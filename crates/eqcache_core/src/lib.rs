//! # eqcache_core
//!
//! Two-pass equation rendering for document builds.
//!
//! This crate provides:
//! - The `EquationCache` context shared by every document of a build
//! - Placeholder tokens that stand in for equations between the passes
//! - Post-processing of SVG and CommonHTML engine output
//! - Configuration loading
//!
//! ## Example
//!
//! ```rust,ignore
//! use eqcache_core::{EquationCache, ResolverConfig};
//!
//! let config = ResolverConfig::from_file(".eqcache.json")?;
//! let cache = EquationCache::from_config(&config)?;
//!
//! // First pass, while the document text is being assembled.
//! let body = format!("Energy is {}.", cache.make_placeholder("E = mc^2", true));
//!
//! // Second pass, once the document is complete.
//! let html = cache.fill_placeholders(&body, config.output).await;
//!
//! // Once per build.
//! cache.flush().await?;
//! ```

mod cache;
mod config;
mod error;
pub mod markup;
pub mod placeholder;

pub use cache::EquationCache;
pub use config::{CONFIG_FILES, ResolverConfig};
pub use error::EquationError;
pub use placeholder::{PLACEHOLDER_MARKER, PendingEquation, Placeholder, find_placeholders};

pub use eqcache_engine::{CommandLauncher, EngineLauncher, EngineOptions, MathEngine, OutputMode};
pub use eqcache_store::{CacheKey, EquationStore};
