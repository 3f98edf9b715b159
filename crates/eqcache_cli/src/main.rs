//! eqcache CLI
//!
//! Renders TeX through the equation cache and manages the cache file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use eqcache_core::{OutputMode, ResolverConfig};

mod commands;
mod utils;

/// eqcache - Cached math rendering for document builds
#[derive(Parser)]
#[command(name = "eqcache")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Cache file path (overrides the configuration)
    #[arg(long, global = true)]
    cache_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a TeX expression through the cache
    Render {
        /// TeX source, without delimiters
        tex: String,

        /// Render as display (block) math
        #[arg(long)]
        display: bool,

        /// Output format (svg, html)
        #[arg(short, long)]
        output: Option<OutputMode>,
    },

    /// Manage the equation cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand)]
enum CacheCommands {
    /// Show the cache location and size
    Info,
    /// Delete the cache file
    Clear,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Render {
            tex,
            display,
            output,
        } => commands::render::run_render(config, &tex, display, output),
        Commands::Cache { command } => match command {
            CacheCommands::Info => commands::cache::run_info(&config).map(|_| false),
            CacheCommands::Clear => commands::cache::run_clear(&config).map(|_| false),
        },
    }
}

fn load_config(cli: &Cli) -> Result<ResolverConfig> {
    let mut config = if let Some(ref path) = cli.config {
        ResolverConfig::from_file(path).into_diagnostic()?
    } else if let Some(path) = ResolverConfig::discover(".") {
        info!("Using config: {}", path.display());
        ResolverConfig::from_file(&path).into_diagnostic()?
    } else {
        ResolverConfig::new()
    };

    if let Some(ref cache_file) = cli.cache_file {
        config.cache_file = Some(cache_file.clone());
        config.base_dir = None;
    }

    Ok(config)
}
