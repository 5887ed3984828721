//! Entry point for the `skillsync` binary.

use std::process::ExitCode;

use colored::Colorize;
use skillsync_cli::error::exit_code_from_error;

#[tokio::main]
async fn main() -> ExitCode {
    match skillsync_cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::from(exit_code_from_error(&err))
        },
    }
}
