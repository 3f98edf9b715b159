//! `eqcache render`

use miette::{IntoDiagnostic, Result};
use tracing::warn;

use eqcache_core::{EquationCache, OutputMode, ResolverConfig};

use crate::utils::build_runtime;

/// Renders one expression, prints the markup and persists the cache.
///
/// Returns `true` when the expression produced no markup.
pub fn run_render(
    mut config: ResolverConfig,
    tex: &str,
    display: bool,
    output: Option<OutputMode>,
) -> Result<bool> {
    if let Some(output) = output {
        config.output = output;
    }

    let cache = EquationCache::from_config(&config).into_diagnostic()?;
    let runtime = build_runtime()?;

    let markup = runtime.block_on(async {
        let markup = cache.render(tex, !display, config.output).await;
        cache.flush().await.map(|_| markup)
    });
    let markup = markup.into_diagnostic()?;

    if markup.is_empty() {
        warn!("No markup produced for \"{}\"", tex);
        return Ok(true);
    }

    println!("{}", markup);
    Ok(false)
}
