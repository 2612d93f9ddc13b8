//! Tolerant model-response parsing.
//!
//! Models are instructed to return bare JSON but routinely wrap it in
//! markdown fences or surrounding prose. The parser peels those layers,
//! normalizes the fields, and degrades to a fallback result instead of
//! erroring; no input can make it panic or return an error to the caller.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::models::issue::{Category, Issue, Severity};
use crate::models::ParsedReview;

/// Summary used when the response could not be parsed as structured data.
pub const FALLBACK_SUMMARY: &str =
    "The model returned a response that could not be parsed as structured JSON. \
     The raw response is shown below.";

/// Score assigned when the model omits one or returns a non-numeric value.
const DEFAULT_SCORE: i64 = 5;

/// Matches the first markdown code fence (```json ... ``` or ``` ... ```),
/// capturing the inner content.
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*\n?(.*?)\n?\s*```").unwrap());

/// Parse a raw model response into a [`ParsedReview`].
///
/// Handles raw JSON, markdown-fenced JSON, JSON buried in prose, and
/// falls back gracefully when nothing parseable is found.
pub fn parse_review(raw_text: &str) -> ParsedReview {
    let mut text = raw_text.trim().to_string();

    // Strip markdown code fences if present
    if let Some(cap) = FENCE_RE.captures(&text) {
        if let Some(inner) = cap.get(1) {
            text = inner.as_str().trim().to_string();
        }
    }

    let data = match serde_json::from_str::<Value>(&text) {
        Ok(value) => value,
        Err(_) => match extract_brace_span(&text) {
            Some(span) => match serde_json::from_str::<Value>(span) {
                Ok(value) => value,
                Err(_) => return fallback_review(raw_text),
            },
            None => return fallback_review(raw_text),
        },
    };

    // Both summary and score are required
    if data.get("summary").is_none() || data.get("score").is_none() {
        return fallback_review(raw_text);
    }

    let summary = data
        .get("summary")
        .and_then(Value::as_str)
        .unwrap_or("No summary.")
        .to_string();
    let score = normalize_score(data.get("score"));
    let issues = data
        .get("issues")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(convert_issue).collect())
        .unwrap_or_default();
    let corrected_code = data
        .get("corrected_code")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    ParsedReview {
        summary,
        score,
        issues,
        corrected_code,
        raw_fallback: None,
    }
}

/// Greedy brace-delimited object span: first `{` through last `}`.
fn extract_brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start < end {
        Some(&text[start..=end])
    } else {
        None
    }
}

/// Minimal well-formed result for unparseable responses. The raw text is
/// kept inspectable for display and debugging.
fn fallback_review(raw_text: &str) -> ParsedReview {
    ParsedReview {
        summary: FALLBACK_SUMMARY.to_string(),
        score: DEFAULT_SCORE,
        issues: Vec::new(),
        corrected_code: String::new(),
        raw_fallback: Some(raw_text.to_string()),
    }
}

/// Coerce a score value to an integer clamped into [1, 10].
fn normalize_score(value: Option<&Value>) -> i64 {
    let coerced = match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match coerced {
        Some(score) => score.clamp(1, 10),
        None => DEFAULT_SCORE,
    }
}

/// Convert one issue element defensively. Non-object elements are dropped.
fn convert_issue(item: &Value) -> Option<Issue> {
    let obj = item.as_object()?;

    let line = match obj.get("line") {
        Some(Value::Number(n)) => n.as_u64().map(|v| v.min(u32::MAX as u64) as u32).unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<u32>().unwrap_or(0),
        _ => 0,
    };
    let severity = obj
        .get("severity")
        .and_then(Value::as_str)
        .map(Severity::from_loose)
        .unwrap_or(Severity::Info);
    let category = obj
        .get("category")
        .and_then(Value::as_str)
        .map(Category::from_loose)
        .unwrap_or(Category::General);
    let title = obj
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or("Untitled")
        .to_string();
    let description = obj
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let suggestion = obj
        .get("suggestion")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some(Issue {
        line,
        severity,
        category,
        title,
        description,
        suggestion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_json() {
        let raw = r#"{"summary":"Clean code.","score":9,"issues":[],"corrected_code":""}"#;
        let review = parse_review(raw);
        assert_eq!(review.summary, "Clean code.");
        assert_eq!(review.score, 9);
        assert!(review.issues.is_empty());
        assert!(review.raw_fallback.is_none());
    }

    #[test]
    fn parses_fenced_json_and_clamps_score() {
        let raw = "```json\n{\"summary\":\"ok\",\"score\":11,\"issues\":[]}\n```";
        let review = parse_review(raw);
        assert_eq!(review.summary, "ok");
        assert_eq!(review.score, 10);
        assert!(review.issues.is_empty());
    }

    #[test]
    fn parses_fence_without_json_tag() {
        let raw = "```\n{\"summary\":\"ok\",\"score\":3}\n```";
        let review = parse_review(raw);
        assert_eq!(review.score, 3);
    }

    #[test]
    fn parses_json_buried_in_prose() {
        let raw = "Here is my review:\n{\"summary\":\"fine\",\"score\":7}\nHope that helps!";
        let review = parse_review(raw);
        assert_eq!(review.summary, "fine");
        assert_eq!(review.score, 7);
    }

    #[test]
    fn unparseable_text_falls_back() {
        let raw = "not json at all";
        let review = parse_review(raw);
        assert_eq!(review.summary, FALLBACK_SUMMARY);
        assert_eq!(review.score, 5);
        assert!(review.issues.is_empty());
        assert_eq!(review.raw_fallback.as_deref(), Some(raw));
    }

    #[test]
    fn missing_summary_falls_back() {
        let review = parse_review(r#"{"score":5}"#);
        assert_eq!(review.summary, FALLBACK_SUMMARY);
        assert_eq!(review.raw_fallback.as_deref(), Some(r#"{"score":5}"#));
    }

    #[test]
    fn missing_score_falls_back() {
        let review = parse_review(r#"{"summary":"ok"}"#);
        assert_eq!(review.summary, FALLBACK_SUMMARY);
        assert!(review.raw_fallback.is_some());
    }

    #[test]
    fn score_clamped_low() {
        let review = parse_review(r#"{"summary":"bad","score":-3}"#);
        assert_eq!(review.score, 1);
    }

    #[test]
    fn non_numeric_score_defaults() {
        let review = parse_review(r#"{"summary":"ok","score":"excellent"}"#);
        assert_eq!(review.score, 5);
    }

    #[test]
    fn numeric_string_score_coerced() {
        let review = parse_review(r#"{"summary":"ok","score":"8"}"#);
        assert_eq!(review.score, 8);
    }

    #[test]
    fn float_score_truncated() {
        let review = parse_review(r#"{"summary":"ok","score":7.9}"#);
        assert_eq!(review.score, 7);
    }

    #[test]
    fn missing_issue_fields_get_defaults() {
        let raw = r#"{"summary":"ok","score":6,"issues":[{}]}"#;
        let review = parse_review(raw);
        assert_eq!(review.issues.len(), 1);
        let issue = &review.issues[0];
        assert_eq!(issue.line, 0);
        assert_eq!(issue.severity, Severity::Info);
        assert_eq!(issue.category, Category::General);
        assert_eq!(issue.title, "Untitled");
        assert_eq!(issue.description, "");
        assert_eq!(issue.suggestion, "");
    }

    #[test]
    fn issue_fields_converted() {
        let raw = r#"{"summary":"ok","score":4,"issues":[{
            "line": 17,
            "severity": "critical",
            "category": "security",
            "title": "SQL injection",
            "description": "User input concatenated into a query.",
            "suggestion": "Use parameterized queries."
        }]}"#;
        let review = parse_review(raw);
        let issue = &review.issues[0];
        assert_eq!(issue.line, 17);
        assert_eq!(issue.severity, Severity::Critical);
        assert_eq!(issue.category, Category::Security);
        assert_eq!(issue.title, "SQL injection");
    }

    #[test]
    fn unknown_severity_and_category_fall_back() {
        let raw = r#"{"summary":"ok","score":4,"issues":[{
            "severity": "catastrophic-ish",
            "category": "vibes"
        }]}"#;
        let review = parse_review(raw);
        assert_eq!(review.issues[0].severity, Severity::Info);
        assert_eq!(review.issues[0].category, Category::General);
    }

    #[test]
    fn string_line_number_coerced() {
        let raw = r#"{"summary":"ok","score":4,"issues":[{"line":"42"}]}"#;
        let review = parse_review(raw);
        assert_eq!(review.issues[0].line, 42);
    }

    #[test]
    fn negative_line_number_becomes_unknown() {
        let raw = r#"{"summary":"ok","score":4,"issues":[{"line":-5}]}"#;
        let review = parse_review(raw);
        assert_eq!(review.issues[0].line, 0);
    }

    #[test]
    fn non_object_issue_elements_dropped() {
        let raw = r#"{"summary":"ok","score":4,"issues":["stray string",{"line":1}]}"#;
        let review = parse_review(raw);
        assert_eq!(review.issues.len(), 1);
        assert_eq!(review.issues[0].line, 1);
    }

    #[test]
    fn missing_issues_and_corrected_code_default() {
        let review = parse_review(r#"{"summary":"ok","score":6}"#);
        assert!(review.issues.is_empty());
        assert_eq!(review.corrected_code, "");
    }

    #[test]
    fn empty_input_falls_back() {
        let review = parse_review("");
        assert_eq!(review.summary, FALLBACK_SUMMARY);
        assert_eq!(review.raw_fallback.as_deref(), Some(""));
    }

    #[test]
    fn fence_with_prose_around_it() {
        let raw = "Sure! Here's the review:\n```json\n{\"summary\":\"nice\",\"score\":8}\n```\nLet me know if you need more.";
        let review = parse_review(raw);
        assert_eq!(review.summary, "nice");
        assert_eq!(review.score, 8);
    }
}
