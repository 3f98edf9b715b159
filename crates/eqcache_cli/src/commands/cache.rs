//! `eqcache cache`

use miette::{IntoDiagnostic, Result};

use eqcache_core::{EquationStore, ResolverConfig};

pub fn run_info(config: &ResolverConfig) -> Result<()> {
    let path = config.cache_path().into_diagnostic()?;
    let store = EquationStore::load(&path);

    println!("Cache file: {}", path.display());
    println!("Equations: {}", store.len());
    Ok(())
}

pub fn run_clear(config: &ResolverConfig) -> Result<()> {
    let path = config.cache_path().into_diagnostic()?;

    if EquationStore::remove_file(&path).into_diagnostic()? {
        println!("Removed {}", path.display());
    } else {
        println!("No cache file at {}", path.display());
    }
    Ok(())
}
