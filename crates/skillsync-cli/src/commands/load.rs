//! `skillsync load`: the plugin host entry point.
//!
//! Syncs (tolerating an unreachable sitemap), then prints the registration a
//! host receives: skill name, description, and the document body.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use skillsync_core::{SkillConfig, SkillRegistry, SkillSync, load_skill};

use crate::error::CliError;
use crate::output::{OutputFormat, print_json};
use crate::utils::cli_args::FormatArg;

/// Arguments for `skillsync load`.
#[derive(Args, Clone, Debug)]
pub struct LoadArgs {
    /// Output format
    #[command(flatten)]
    pub format: FormatArg,
}

/// Sync, register, and print the registration.
pub async fn execute(args: &LoadArgs, config: &SkillConfig) -> Result<()> {
    let sync = SkillSync::from_config(config).map_err(CliError::from)?;
    let mut registry = SkillRegistry::default();
    load_skill(&sync, &mut registry)
        .await
        .map_err(CliError::from)?;

    match args.format.resolve() {
        OutputFormat::Json => print_json(&registry)?,
        OutputFormat::Text => {
            for skill in registry.iter() {
                println!("{} {}", skill.name.bold(), skill.description.dimmed());
                println!();
                print!("{}", skill.content);
            }
        },
    }
    Ok(())
}
