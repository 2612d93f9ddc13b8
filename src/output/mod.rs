//! Output renderers: terminal, JSON, Markdown report.

pub mod json;
pub mod markdown;
pub mod terminal;

use crate::models::ReviewOutcome;

/// Trait for rendering a review outcome to an output format.
pub trait OutputRenderer {
    /// Render the outcome to a string.
    fn render(&self, outcome: &ReviewOutcome) -> String;
}
