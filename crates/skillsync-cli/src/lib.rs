//! skillsync CLI - keep a documentation skill document in sync with a sitemap.
//!
//! Commands live in [`commands`]; this module parses arguments, sets up logging
//! and configuration, and dispatches.

use anyhow::Result;
use clap::Parser;
use skillsync_core::SkillConfig;
use tracing::debug;

mod cli;
mod commands;
pub mod error;
mod output;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::utils::initialize_logging;

/// Execute the skillsync CLI with the current arguments and environment.
///
/// # Errors
///
/// Returns an error if configuration loading or the command fails. The error
/// carries a [`CliError`] category when one applies.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    initialize_logging(&cli)?;

    let config = load_config(&cli)?;
    debug!(document = %config.document.display(), sitemap = %config.sitemap_url, "Using config");

    match &cli.command {
        Commands::Sync(args) => commands::sync(args, &config).await,
        Commands::Load(args) => commands::load(args, &config).await,
        Commands::Check(args) => commands::check(args, &config).await,
    }
}

fn load_config(cli: &Cli) -> Result<SkillConfig> {
    let mut config = SkillConfig::load(cli.config.as_deref()).map_err(CliError::usage)?;
    if let Some(document) = &cli.document {
        config.document.clone_from(document);
    }
    Ok(config)
}
