//! Progress display for long-running checks.

use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;

/// Progress bars drawn on stderr.
pub struct ProgressDisplay;

impl ProgressDisplay {
    /// Bar for `total` steps, or a hidden bar when stderr is not a terminal.
    pub fn bar(total: u64, message: &str) -> ProgressBar {
        if !std::io::stderr().is_terminal() {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message(message.to_string());
        pb
    }
}
