//! Output formats and shared printing helpers.
//!
//! Every command prints either human-readable text or one pretty-printed JSON
//! document on stdout. Logs and progress go to stderr.

mod progress;

pub use progress::ProgressDisplay;

use anyhow::Result;
use serde::Serialize;

/// Output format for command results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty text output
    Text,
    /// Single JSON document
    Json,
}

/// Print `value` as pretty JSON followed by a newline.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
