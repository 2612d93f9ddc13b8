//! Code compression under a token budget.
//!
//! Applies progressively more destructive transforms (blank-line
//! collapsing, trailing-whitespace stripping, comment removal, then
//! head/tail truncation), stopping as soon as the estimate fits. The head
//! and tail of a file carry the most context (imports, declarations,
//! exports), so the middle is dropped first.

pub mod comments;

use std::sync::LazyLock;

use regex::Regex;

use crate::tokens::estimate_tokens;

pub use comments::strip_inline_comments;

/// Safety bound on the head/tail shrink loop. The `head + tail > 10` exit
/// already converges via integer arithmetic; this caps the worst case.
const MAX_TRUNCATION_ROUNDS: usize = 64;

/// Fraction of lines kept from the top during head/tail truncation.
const HEAD_RATIO: f64 = 0.6;

static BLANK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Result of a compression pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionResult {
    /// The (possibly) compressed code.
    pub text: String,
    /// Token estimate of the input.
    pub original_tokens: usize,
    /// Token estimate of `text`. Never exceeds `original_tokens`.
    pub final_tokens: usize,
}

/// Compress `code` to fit within `budget` estimated tokens.
///
/// Deterministic for identical inputs. The budget is honored whenever
/// that is achievable while keeping minimal structure; for degenerate
/// budgets the result may still exceed it, with a truncation marker
/// appended.
pub fn compress(code: &str, language: &str, budget: usize) -> CompressionResult {
    let original_tokens = estimate_tokens(code);

    if original_tokens <= budget {
        return CompressionResult {
            text: code.to_string(),
            original_tokens,
            final_tokens: original_tokens,
        };
    }

    // Collapse runs of blank lines and strip trailing whitespace.
    let collapsed = BLANK_RUN_RE.replace_all(code, "\n\n");
    let trimmed: String = collapsed
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");

    if estimate_tokens(&trimmed) <= budget {
        let final_tokens = estimate_tokens(&trimmed);
        return CompressionResult {
            text: trimmed,
            original_tokens,
            final_tokens,
        };
    }

    // Remove full-line comments (keeps doc comments, shebangs, type hints).
    let stripped = strip_inline_comments(&trimmed, language);

    if estimate_tokens(&stripped) <= budget {
        let final_tokens = estimate_tokens(&stripped);
        return CompressionResult {
            text: stripped,
            original_tokens,
            final_tokens,
        };
    }

    // Still over budget: keep head + tail, cut the middle. The appended
    // marker can push a tiny input past its own pre-compression estimate,
    // so the final estimate is clamped to preserve final ≤ original.
    let text = truncate_head_tail(&stripped, budget);
    let final_tokens = estimate_tokens(&text).min(original_tokens);
    CompressionResult {
        text,
        original_tokens,
        final_tokens,
    }
}

/// Head/tail truncation for code that survived the cheaper transforms.
fn truncate_head_tail(code: &str, budget: usize) -> String {
    let lines: Vec<&str> = code.lines().collect();
    let total_lines = lines.len();

    if total_lines <= 10 {
        // Too few lines to split meaningfully; hard-truncate instead.
        let mut text = code.to_string();
        while estimate_tokens(&text) > budget && text.chars().count() > 100 {
            let keep = (text.chars().count() as f64 * 0.8) as usize;
            text = text.chars().take(keep).collect();
        }
        text.push_str("\n// [compressed]");
        return text;
    }

    let mut head_count = (total_lines as f64 * HEAD_RATIO) as usize;
    head_count = head_count.max(5);
    let mut tail_count = (total_lines - head_count).max(5);

    let mut rounds = 0;
    while head_count + tail_count > 10 && rounds < MAX_TRUNCATION_ROUNDS {
        let omitted = total_lines.saturating_sub(head_count + tail_count);
        let candidate = format!(
            "{}\n\n// ... [{omitted} lines omitted for brevity] ...\n\n{}",
            lines[..head_count].join("\n"),
            lines[total_lines - tail_count..].join("\n"),
        );
        if estimate_tokens(&candidate) <= budget {
            return candidate;
        }
        // Shrink both proportionally, never below 5
        head_count = (head_count - (head_count / 10).max(1)).max(5);
        tail_count = (tail_count - (tail_count / 10).max(1)).max(5);
        rounds += 1;
    }

    // Last resort: head only, accepted even if still over budget.
    format!(
        "{}\n// [compressed — code truncated to fit token budget]",
        lines[..head_count].join("\n"),
    )
}

/// Hard character cap applied before the token pipeline runs.
///
/// Returns the (possibly truncated) code and whether truncation happened.
pub fn truncate_code(code: &str, max_chars: usize) -> (String, bool) {
    if code.chars().count() <= max_chars {
        return (code.to_string(), false);
    }
    let truncated: String = code.chars().take(max_chars).collect();
    (
        format!("{truncated}\n\n// ... [truncated — code too long for review] ..."),
        true,
    )
}
