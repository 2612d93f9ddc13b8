//! Markdown report renderer.
//!
//! Produces a self-contained report suitable for saving next to the
//! reviewed file or attaching to a ticket.

use crate::models::{Issue, ReviewOutcome};
use crate::output::OutputRenderer;

/// Renders the outcome as a Markdown document.
pub struct MarkdownRenderer;

impl OutputRenderer for MarkdownRenderer {
    fn render(&self, outcome: &ReviewOutcome) -> String {
        let mut lines: Vec<String> = Vec::new();
        lines.push("# 🔍 AI Code Review Report\n".to_string());

        if let Some(ref error) = outcome.error {
            lines.push(format!("**Error:** {error}\n"));
            return lines.join("\n");
        }

        let review = &outcome.review;
        lines.push(format!("**Overall Score:** {} / 10\n", review.score));
        lines.push(format!("## Summary\n\n{}\n", review.summary));

        if review.issues.is_empty() {
            lines.push("## Issues Found\n\n✅ No issues found — great job!\n".to_string());
        } else {
            lines.push(format!("## Issues Found ({})\n", review.issues.len()));
            for (i, issue) in review.issues.iter().enumerate() {
                lines.push(render_issue(i + 1, issue));
            }
        }

        if !review.corrected_code.is_empty() {
            lines.push("## Corrected Code\n".to_string());
            lines.push(format!("```\n{}\n```\n", review.corrected_code));
        }

        if let Some(ref raw) = review.raw_fallback {
            lines.push("## Raw Response\n".to_string());
            lines.push(format!("```\n{raw}\n```\n"));
        }

        lines.join("\n")
    }
}

fn render_issue(index: usize, issue: &Issue) -> String {
    let mut lines = vec![
        format!("### {index}. {} — {}", issue.severity.label(), issue.title),
        format!("- **Category:** {}", issue.category.display_name()),
        format!("- **Line:** {}", issue.line),
        format!("- **Description:** {}", issue.description),
    ];
    if !issue.suggestion.is_empty() {
        lines.push(format!("- **Suggestion:** {}", issue.suggestion));
    }
    lines.push(String::new());
    lines.join("\n")
}
