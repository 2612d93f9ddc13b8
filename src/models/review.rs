//! Review result types.

use serde::{Deserialize, Serialize};

use super::issue::Issue;

/// Structured review data extracted from a model response.
///
/// Always well-formed: the parser degrades to a fallback rather than
/// failing, and `score` is clamped to [1, 10] during normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedReview {
    /// Overall assessment, 2-4 sentences.
    pub summary: String,
    /// 1-10 after normalization (10 = perfect). 0 only in error outcomes.
    pub score: i64,
    /// Issues found. May be empty.
    #[serde(default)]
    pub issues: Vec<Issue>,
    /// Improved version of the full code. Empty when the code was fine.
    #[serde(default)]
    pub corrected_code: String,
    /// Original raw text, retained when structured parsing failed so the
    /// caller can still display or debug it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_fallback: Option<String>,
}

/// Final result of a review invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    /// The parsed review data.
    #[serde(flatten)]
    pub review: ParsedReview,
    /// Raw model response text. Empty for cache hits and failures.
    #[serde(default)]
    pub raw_response: String,
    /// Whether the result was served from the cache.
    #[serde(default)]
    pub from_cache: bool,
    /// Populated when the model call failed after retries. Callers must
    /// check this before rendering issue data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReviewOutcome {
    /// Build a successful outcome from parsed data.
    pub fn from_review(review: ParsedReview, raw_response: String, from_cache: bool) -> Self {
        Self {
            review,
            raw_response,
            from_cache,
            error: None,
        }
    }

    /// Build a failure outcome carrying only an error description.
    pub fn from_error(error: String) -> Self {
        Self {
            review: ParsedReview {
                summary: String::new(),
                score: 0,
                issues: Vec::new(),
                corrected_code: String::new(),
                raw_fallback: None,
            },
            raw_response: String::new(),
            from_cache: false,
            error: Some(error),
        }
    }
}
