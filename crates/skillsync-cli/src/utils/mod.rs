//! Shared CLI helpers.

pub mod cli_args;
mod logging;

pub use logging::initialize_logging;
