//! Terminal renderer: styled flowing text, most severe issues first.

use colored::Colorize;

use crate::models::{Issue, ReviewOutcome, Severity};
use crate::output::OutputRenderer;

/// Terminal output renderer with colored, flowing text.
pub struct TerminalRenderer;

impl OutputRenderer for TerminalRenderer {
    fn render(&self, outcome: &ReviewOutcome) -> String {
        let mut output = String::new();

        if let Some(ref error) = outcome.error {
            output.push_str(&format!(" {} {}\n", "✖".red().bold(), error.red()));
            return output;
        }

        let review = &outcome.review;

        let score_str = format!("{}/10", review.score);
        let score_colored = if review.score >= 8 {
            score_str.green().bold()
        } else if review.score >= 5 {
            score_str.yellow().bold()
        } else {
            score_str.red().bold()
        };
        output.push_str(&format!(" {} {}", "Score:".bold(), score_colored));
        if outcome.from_cache {
            output.push_str(&format!(" {}", "(served from cache)".dimmed()));
        }
        output.push_str("\n\n");

        output.push_str(&format!(" {}\n\n", review.summary));

        if review.issues.is_empty() {
            output.push_str(&format!("{}", " ✔ No issues found.\n".green()));
        } else {
            let mut sorted = review.issues.clone();
            sorted.sort_by(|a, b| a.severity.cmp(&b.severity).then(a.line.cmp(&b.line)));

            for issue in &sorted {
                output.push_str(&render_issue(issue));
            }

            output.push_str(&format!(
                "{}\n",
                "───────────────────────────────────".dimmed()
            ));
            output.push_str(&summary_line(&sorted));
        }

        if let Some(ref raw) = review.raw_fallback {
            output.push_str(&format!(
                "\n {}\n{}\n",
                "Raw response:".bold(),
                raw.dimmed()
            ));
        }

        output
    }
}

fn render_issue(issue: &Issue) -> String {
    let (icon, severity_str) = match issue.severity {
        Severity::Critical | Severity::High => (
            "✖".red().bold().to_string(),
            issue.severity.to_string().red().bold().to_string(),
        ),
        Severity::Medium => (
            "⚠".yellow().bold().to_string(),
            issue.severity.to_string().yellow().bold().to_string(),
        ),
        Severity::Low | Severity::Info => (
            "ℹ".blue().bold().to_string(),
            issue.severity.to_string().blue().bold().to_string(),
        ),
    };

    let location = if issue.line > 0 {
        format!("line {}", issue.line)
    } else {
        "line ?".to_string()
    };

    let mut out = format!(
        " {} {} [{}] at {}\n",
        icon,
        severity_str,
        issue.category.display_name(),
        location.bold()
    );
    out.push_str(&format!(
        "   {} — {}\n",
        issue.title.bold(),
        issue.description
    ));
    if !issue.suggestion.is_empty() {
        out.push_str(&format!("   {} {}\n", "→".cyan(), issue.suggestion));
    }
    out.push('\n');
    out
}

fn summary_line(issues: &[Issue]) -> String {
    let critical = issues
        .iter()
        .filter(|i| i.severity == Severity::Critical)
        .count();
    let high = issues.iter().filter(|i| i.severity == Severity::High).count();
    let rest = issues.len() - critical - high;

    format!(
        " {} issue(s): {} critical, {} high, {} other\n",
        issues.len().to_string().bold(),
        critical.to_string().red().bold(),
        high.to_string().red(),
        rest,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::issue::Category;
    use crate::models::ParsedReview;

    fn outcome() -> ReviewOutcome {
        ReviewOutcome::from_review(
            ParsedReview {
                summary: "Mostly fine.".into(),
                score: 7,
                issues: vec![
                    Issue {
                        line: 30,
                        severity: Severity::Low,
                        category: Category::Style,
                        title: "Long line".into(),
                        description: "Exceeds 100 columns.".into(),
                        suggestion: String::new(),
                    },
                    Issue {
                        line: 4,
                        severity: Severity::Critical,
                        category: Category::Bug,
                        title: "Off-by-one".into(),
                        description: "Loop misses the last element.".into(),
                        suggestion: "Use ..= instead of ..".into(),
                    },
                ],
                corrected_code: String::new(),
                raw_fallback: None,
            },
            String::new(),
            false,
        )
    }

    #[test]
    fn renders_score_and_summary() {
        let rendered = TerminalRenderer.render(&outcome());
        assert!(rendered.contains("7/10"));
        assert!(rendered.contains("Mostly fine."));
    }

    #[test]
    fn most_severe_issue_first() {
        let rendered = TerminalRenderer.render(&outcome());
        let critical_pos = rendered.find("Off-by-one").unwrap();
        let low_pos = rendered.find("Long line").unwrap();
        assert!(critical_pos < low_pos);
    }

    #[test]
    fn suggestion_arrow_when_present() {
        let rendered = TerminalRenderer.render(&outcome());
        assert!(rendered.contains("Use ..= instead of .."));
    }

    #[test]
    fn counts_in_summary_line() {
        let rendered = TerminalRenderer.render(&outcome());
        assert!(rendered.contains("issue(s)"));
        assert!(rendered.contains("critical"));
    }

    #[test]
    fn clean_review_message() {
        let mut o = outcome();
        o.review.issues.clear();
        let rendered = TerminalRenderer.render(&o);
        assert!(rendered.contains("No issues found"));
    }

    #[test]
    fn cache_hit_annotated() {
        let mut o = outcome();
        o.from_cache = true;
        let rendered = TerminalRenderer.render(&o);
        assert!(rendered.contains("served from cache"));
    }

    #[test]
    fn error_outcome_short_circuits() {
        let o = ReviewOutcome::from_error("API call failed: no luck".into());
        let rendered = TerminalRenderer.render(&o);
        assert!(rendered.contains("API call failed: no luck"));
        assert!(!rendered.contains("/10"));
    }

    #[test]
    fn unknown_line_rendered_as_question_mark() {
        let mut o = outcome();
        o.review.issues[0].line = 0;
        let rendered = TerminalRenderer.render(&o);
        assert!(rendered.contains("line ?"));
    }
}
