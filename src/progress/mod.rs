//! Status reporting for terminal output.
//!
//! A review is a single task with caller-visible latency (seconds), so
//! this renders one colored status line per transition to stderr instead
//! of a live-updating display. Silenced with `--quiet`.

use std::io::{self, Write};

use colored::Colorize;

/// Status of the review task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewStatus {
    /// Waiting on the model.
    InProgress,
    /// Retrying after a transient error.
    Retrying {
        attempt: u32,
        max: u32,
        reason: String,
        backoff_secs: u64,
    },
    /// Served from the cache without a model call.
    CacheHit,
    /// Completed successfully.
    Done,
    /// Failed after retries.
    Failed(String),
}

/// Renders review status transitions to stderr.
pub struct StatusReporter {
    /// If false, all output is suppressed.
    enabled: bool,
}

impl StatusReporter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Print a status line for the given transition.
    pub fn update(&self, status: &ReviewStatus) {
        if !self.enabled {
            return;
        }
        let stderr = io::stderr();
        let mut handle = stderr.lock();
        let _ = writeln!(handle, "{}", Self::line(status));
        let _ = handle.flush();
    }

    /// Format the status line (uncolored content is stable for tests).
    fn line(status: &ReviewStatus) -> String {
        match status {
            ReviewStatus::InProgress => {
                format!("  {} {}", "◌".cyan().bold(), "reviewing…".cyan())
            }
            ReviewStatus::Retrying {
                attempt,
                max,
                reason,
                backoff_secs,
            } => format!(
                "  {} {}",
                "⟳".yellow().bold(),
                format!("{reason}, retrying in {backoff_secs}s ({attempt}/{max})").yellow()
            ),
            ReviewStatus::CacheHit => {
                format!("  {} {}", "✔".green().bold(), "served from cache".green())
            }
            ReviewStatus::Done => {
                format!("  {} {}", "✔".green().bold(), "review complete".green())
            }
            ReviewStatus::Failed(reason) => {
                format!("  {} {}", "✖".red().bold(), reason.red())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_reporter_no_panic() {
        let reporter = StatusReporter::new(false);
        reporter.update(&ReviewStatus::InProgress);
        reporter.update(&ReviewStatus::Done);
        reporter.update(&ReviewStatus::Failed("boom".into()));
    }

    #[test]
    fn retry_line_includes_context() {
        let line = StatusReporter::line(&ReviewStatus::Retrying {
            attempt: 2,
            max: 3,
            reason: "Rate limited by API".into(),
            backoff_secs: 4,
        });
        assert!(line.contains("Rate limited by API"));
        assert!(line.contains("retrying in 4s"));
        assert!(line.contains("(2/3)"));
    }

    #[test]
    fn cache_hit_line_mentions_cache() {
        let line = StatusReporter::line(&ReviewStatus::CacheHit);
        assert!(line.contains("served from cache"));
    }
}
