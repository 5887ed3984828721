//! `skillsync sync`: one sync run.
//!
//! ```bash
//! skillsync sync                 # fetch, gate, rewrite if needed
//! skillsync sync --dry-run       # print the candidate document instead
//! skillsync sync -f json         # machine-readable outcome
//! ```

use std::path::Path;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use skillsync_core::{SkillConfig, SkillSync, SyncOutcome, format_timestamp};

use crate::error::CliError;
use crate::output::{OutputFormat, print_json};
use crate::utils::cli_args::FormatArg;

/// Arguments for `skillsync sync`.
#[derive(Args, Clone, Debug)]
pub struct SyncArgs {
    /// Render and evaluate both gates without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[command(flatten)]
    pub format: FormatArg,
}

#[derive(Serialize)]
struct SyncReport<'a> {
    path: &'a Path,
    #[serde(flatten)]
    outcome: &'a SyncOutcome,
}

/// Run one sync and report the outcome.
pub async fn execute(args: &SyncArgs, config: &SkillConfig) -> Result<()> {
    let sync = SkillSync::from_config(config)
        .map_err(CliError::from)?
        .dry_run(args.dry_run);
    let outcome = sync.run().await.map_err(CliError::from)?;

    match args.format.resolve() {
        OutputFormat::Json => print_json(&SyncReport {
            path: &config.document,
            outcome: &outcome,
        })?,
        OutputFormat::Text => print_text(&outcome, &config.document),
    }
    Ok(())
}

fn print_text(outcome: &SyncOutcome, document: &Path) {
    match outcome {
        SyncOutcome::Fresh { existing, sitemap } => println!(
            "{} sitemap ({}) is not newer than {} ({})",
            "Up to date:".green(),
            format_timestamp(sitemap),
            document.display(),
            format_timestamp(existing),
        ),
        SyncOutcome::Empty => println!(
            "{} sitemap lists no pages for this site, kept {}",
            "Skipped:".yellow(),
            document.display()
        ),
        SyncOutcome::Unchanged { .. } => println!(
            "{} {} already lists every page",
            "Unchanged:".green(),
            document.display()
        ),
        SyncOutcome::Written {
            document: Some(candidate),
            ..
        } => print!("{candidate}"),
        SyncOutcome::Written {
            updated,
            groups,
            items,
            ..
        } => println!(
            "{} {} ({groups} groups, {items} items, updated {})",
            "Wrote".green().bold(),
            document.display(),
            format_timestamp(updated),
        ),
    }
}
