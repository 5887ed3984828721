//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{CheckArgs, LoadArgs, SyncArgs};

/// Keep a documentation skill document in sync with a sitemap.
#[derive(Parser, Clone, Debug)]
#[command(name = "skillsync", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug logs
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Path to configuration file (overrides autodiscovery). Also via `SKILLSYNC_CONFIG`.
    #[arg(long, global = true, value_name = "FILE", env = "SKILLSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path of the skill document (overrides the configured one). Also via `SKILLSYNC_DOCUMENT`.
    #[arg(long, global = true, value_name = "FILE", env = "SKILLSYNC_DOCUMENT")]
    pub document: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Fetch the sitemap and rewrite the document if it changed
    Sync(SyncArgs),
    /// Sync, then print the skill registration a plugin host would receive
    Load(LoadArgs),
    /// Probe every URL listed in the document
    Check(CheckArgs),
}
