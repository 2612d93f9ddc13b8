//! JSON renderer for machine-readable output.

use crate::models::ReviewOutcome;
use crate::output::OutputRenderer;

/// Serializes the full outcome as pretty-printed JSON.
pub struct JsonRenderer;

impl OutputRenderer for JsonRenderer {
    fn render(&self, outcome: &ReviewOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }
}
