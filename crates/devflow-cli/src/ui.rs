//! Terminal adapters for the core's progress and confirmation traits.

use devflow_core::confirm::Confirm;
use devflow_core::progress::Progress;
use devflow_core::DevflowError;
use dialoguer::theme::ColorfulTheme;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner on stderr. Hidden when stderr is not a terminal; `quiet` also
/// suppresses the completion line (used for `--json`).
pub struct Spinner {
    bar: ProgressBar,
    quiet: bool,
}

impl Spinner {
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet || !console::user_attended_stderr() {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        let style = ProgressStyle::default_spinner()
            .template("{spinner} {msg}...")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"]);
        bar.set_style(style);
        Self { bar, quiet }
    }
}

impl Progress for Spinner {
    fn start(&self, message: &str) {
        self.bar.set_message(message.to_string());
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    fn stop(&self, message: &str) {
        self.bar.finish_and_clear();
        if !self.quiet {
            println!("{message}");
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

/// Asks on the terminal; reports non-interactive when stdout is not attended.
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn is_interactive(&self) -> bool {
        console::user_attended()
    }

    fn confirm(&self, prompt: &str) -> devflow_core::Result<bool> {
        dialoguer::Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| DevflowError::Io(std::io::Error::other(e)))
    }
}
