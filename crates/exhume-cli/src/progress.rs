//! Progress bar implementation for batch runs.

use std::path::Path;

use console::Term;
use exhume_core::ProgressSink;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;

/// Indicatif-backed progress bar mapping the coordinator's 0-100 percentage.
///
/// Cleans itself up on drop so partial runs leave no bar behind.
pub struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    /// Creates a new percentage bar.
    #[must_use]
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        Self { bar }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stdout().is_term()
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for CliProgress {
    fn on_progress(&mut self, percent: u8, status: &str) {
        self.bar.set_position(u64::from(percent));
        self.bar.set_message(status.to_string());
    }

    fn on_job_started(&mut self, index: usize, total: usize, source: &Path) {
        self.bar.println(format!(
            "({}/{total}) {}",
            index + 1,
            source.display()
        ));
    }
}
