//! Review orchestrator: compression, caching, prompt construction, and
//! the retrying model call.
//!
//! The single entry point is [`ReviewOrchestrator::review`]. Provider
//! failures never escape it; after the retry budget is exhausted the
//! outcome carries an error string instead.

use std::sync::Arc;

use indexmap::IndexSet;

use crate::cache::{self, CacheEngine};
use crate::compress::compress;
use crate::models::{ReviewOutcome, ReviewRequest};
use crate::parser::parse_review;
use crate::progress::{ReviewStatus, StatusReporter};
use crate::providers::rig::{classify_error, is_retryable, retry_backoff, MAX_ATTEMPTS};
use crate::providers::{ModelProvider, ProviderError};

/// System prompt sent with every review request. Demands bare JSON in a
/// fixed schema; the parser still tolerates deviations.
const SYSTEM_PROMPT: &str = "\
You are an expert senior software engineer performing a thorough code review.
You are meticulous, fair, and constructive. You catch bugs, security issues,
performance problems, and style violations, and you also acknowledge good code.

RULES:
1. Return ONLY valid JSON. No markdown fences, no extra text.
2. Use the exact schema shown below.
3. \"score\" is an integer 1-10 (10 = perfect, 1 = critical problems).
4. \"issues\" is an array; may be empty if code is clean.
5. Each issue must have: line, severity, category, title, description, suggestion.
6. \"severity\" must be one of: critical, high, medium, low, info.
7. \"category\" must be one of: security, bug, performance, style, maintainability, best-practice.
8. \"corrected_code\" should be the improved version of the FULL code with all issues fixed.
   If the code is already perfect, set corrected_code to an empty string.
9. Be specific about line numbers. If you can't pinpoint a line, use 0.

JSON SCHEMA:
{
  \"summary\": \"string, 2-4 sentence overall assessment\",
  \"score\": integer,
  \"issues\": [
    {
      \"line\": integer,
      \"severity\": \"string\",
      \"category\": \"string\",
      \"title\": \"string, short issue title\",
      \"description\": \"string, what's wrong and why it matters\",
      \"suggestion\": \"string, how to fix it\"
    }
  ],
  \"corrected_code\": \"string\"
}";

/// Orchestrates a single code review end to end.
pub struct ReviewOrchestrator {
    provider: Arc<dyn ModelProvider>,
    cache: CacheEngine,
    status: Arc<StatusReporter>,
}

impl ReviewOrchestrator {
    /// Create a new orchestrator.
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        cache: CacheEngine,
        status: Arc<StatusReporter>,
    ) -> Self {
        Self {
            provider,
            cache,
            status,
        }
    }

    /// Run a full code review.
    ///
    /// Compresses the code to the request's token budget, consults the
    /// cache, calls the model on a miss, parses the response, and stores
    /// the parsed data. Never returns an error: failures surface through
    /// the outcome's `error` field.
    pub async fn review(&self, request: &ReviewRequest) -> ReviewOutcome {
        // Compress/truncate to fit the token budget
        let compressed = compress(
            request.code(),
            request.language(),
            request.token_budget(),
        );

        // The fingerprint covers the compressed code: identical inputs
        // compress identically, so equal requests share a cache slot.
        let key = cache::fingerprint(
            &compressed.text,
            request.language(),
            request.focus_areas(),
        );

        if let Some(cached) = self.cache.get(&key) {
            self.status.update(&ReviewStatus::CacheHit);
            return ReviewOutcome::from_review(cached, String::new(), true);
        }

        let user_prompt =
            build_review_prompt(&compressed.text, request.language(), request.focus_areas());

        self.status.update(&ReviewStatus::InProgress);
        let raw_response = match self.call_with_retries(&user_prompt).await {
            Ok(text) => text,
            Err(e) => {
                let short = classify_error(&e)
                    .map(str::to_string)
                    .unwrap_or_else(|| e.to_string());
                self.status.update(&ReviewStatus::Failed(short));
                return ReviewOutcome::from_error(format!("API call failed: {e}"));
            }
        };

        let review = parse_review(&raw_response);
        self.cache.put(&key, &review);
        self.status.update(&ReviewStatus::Done);

        ReviewOutcome::from_review(review, raw_response, false)
    }

    /// Call the provider with bounded exponential backoff.
    async fn call_with_retries(&self, user_prompt: &str) -> Result<String, ProviderError> {
        let mut last_err: Option<ProviderError> = None;

        for attempt in 0..MAX_ATTEMPTS {
            match self.provider.complete(SYSTEM_PROMPT, user_prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if is_retryable(&e) && attempt + 1 < MAX_ATTEMPTS => {
                    let backoff = retry_backoff(attempt);
                    let reason = classify_error(&e)
                        .unwrap_or("Transient error")
                        .to_string();
                    self.status.update(&ReviewStatus::Retrying {
                        attempt: attempt + 1,
                        max: MAX_ATTEMPTS,
                        reason,
                        backoff_secs: backoff.as_secs(),
                    });
                    tokio::time::sleep(backoff).await;
                    self.status.update(&ReviewStatus::InProgress);
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err
            .unwrap_or_else(|| ProviderError::ApiError("max retries exhausted".to_string())))
    }
}

/// Build the user prompt for a code review.
fn build_review_prompt(code: &str, language: &str, focus_areas: &IndexSet<String>) -> String {
    let focus_str = if focus_areas.is_empty() {
        "all categories".to_string()
    } else {
        focus_areas
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "Review the following {language} code.\n\
         Focus especially on: {focus_str}.\n\n\
         ```{}\n{code}\n```",
        language.to_lowercase(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    /// Provider returning a canned response, counting calls.
    struct CannedProvider {
        response: String,
        calls: AtomicUsize,
    }

    impl CannedProvider {
        fn new(response: &str) -> Arc<Self> {
            Arc::new(Self {
                response: response.to_string(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ModelProvider for CannedProvider {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }
    }

    /// Provider that always fails, counting calls.
    struct FailingProvider {
        error_kind: fn() -> ProviderError,
        calls: AtomicUsize,
    }

    impl FailingProvider {
        fn new(error_kind: fn() -> ProviderError) -> Arc<Self> {
            Arc::new(Self {
                error_kind,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ModelProvider for FailingProvider {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err((self.error_kind)())
        }
    }

    fn orchestrator(
        provider: Arc<dyn ModelProvider>,
        cache_dir: &std::path::Path,
    ) -> ReviewOrchestrator {
        ReviewOrchestrator::new(
            provider,
            CacheEngine::new_with_dir(true, 3600, cache_dir.to_path_buf()),
            Arc::new(StatusReporter::new(false)),
        )
    }

    fn request() -> ReviewRequest {
        ReviewRequest::new(
            "def f():\n    return 1\n",
            "Python",
            ["bug".to_string()],
            6000,
        )
    }

    const GOOD_RESPONSE: &str =
        r#"{"summary":"Fine function.","score":9,"issues":[],"corrected_code":""}"#;

    #[tokio::test]
    async fn success_path_parses_response() {
        let dir = tempfile::tempdir().unwrap();
        let provider = CannedProvider::new(GOOD_RESPONSE);
        let orch = orchestrator(provider.clone(), dir.path());

        let outcome = orch.review(&request()).await;
        assert!(outcome.error.is_none());
        assert!(!outcome.from_cache);
        assert_eq!(outcome.review.summary, "Fine function.");
        assert_eq!(outcome.review.score, 9);
        assert_eq!(outcome.raw_response, GOOD_RESPONSE);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn second_call_hits_cache() {
        let dir = tempfile::tempdir().unwrap();
        let provider = CannedProvider::new(GOOD_RESPONSE);
        let orch = orchestrator(provider.clone(), dir.path());

        let first = orch.review(&request()).await;
        let second = orch.review(&request()).await;

        assert!(!first.from_cache);
        assert!(second.from_cache);
        assert_eq!(second.review, first.review);
        // No second model call
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cache_disabled_calls_provider_each_time() {
        let dir = tempfile::tempdir().unwrap();
        let provider = CannedProvider::new(GOOD_RESPONSE);
        let orch = ReviewOrchestrator::new(
            provider.clone(),
            CacheEngine::new_with_dir(false, 3600, dir.path().to_path_buf()),
            Arc::new(StatusReporter::new(false)),
        );

        orch.review(&request()).await;
        let second = orch.review(&request()).await;
        assert!(!second.from_cache);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn api_failure_surfaces_error_after_retries() {
        let dir = tempfile::tempdir().unwrap();
        let provider =
            FailingProvider::new(|| ProviderError::ApiError("HTTP 500 internal".to_string()));
        let orch = orchestrator(provider.clone(), dir.path());

        let outcome = orch.review(&request()).await;
        assert!(outcome.error.as_deref().unwrap().contains("API call failed"));
        assert_eq!(outcome.review.score, 0);
        assert!(outcome.review.issues.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), MAX_ATTEMPTS as usize);
    }

    #[tokio::test]
    async fn not_configured_fails_without_retries() {
        let dir = tempfile::tempdir().unwrap();
        let provider =
            FailingProvider::new(|| ProviderError::NotConfigured("missing key".to_string()));
        let orch = orchestrator(provider.clone(), dir.path());

        let outcome = orch.review(&request()).await;
        assert!(outcome.error.is_some());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unparseable_response_degrades_to_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let provider = CannedProvider::new("I refuse to answer in JSON.");
        let orch = orchestrator(provider.clone(), dir.path());

        let outcome = orch.review(&request()).await;
        assert!(outcome.error.is_none());
        assert_eq!(outcome.review.score, 5);
        assert_eq!(
            outcome.review.raw_fallback.as_deref(),
            Some("I refuse to answer in JSON.")
        );
    }

    #[tokio::test]
    async fn focus_order_does_not_affect_cache_slot() {
        let dir = tempfile::tempdir().unwrap();
        let provider = CannedProvider::new(GOOD_RESPONSE);
        let orch = orchestrator(provider.clone(), dir.path());

        let a = ReviewRequest::new(
            "x = 1",
            "Python",
            ["bug".to_string(), "style".to_string()],
            6000,
        );
        let b = ReviewRequest::new(
            "x = 1",
            "Python",
            ["style".to_string(), "bug".to_string()],
            6000,
        );

        orch.review(&a).await;
        let outcome = orch.review(&b).await;
        assert!(outcome.from_cache);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn prompt_includes_language_focus_and_fence() {
        let areas: IndexSet<String> =
            ["security".to_string(), "performance".to_string()].into_iter().collect();
        let prompt = build_review_prompt("x = 1", "Python", &areas);
        assert!(prompt.contains("Review the following Python code."));
        assert!(prompt.contains("Focus especially on: security, performance."));
        assert!(prompt.contains("```python\nx = 1\n```"));
    }

    #[test]
    fn prompt_defaults_to_all_categories() {
        let areas: IndexSet<String> = IndexSet::new();
        let prompt = build_review_prompt("x = 1", "Python", &areas);
        assert!(prompt.contains("Focus especially on: all categories."));
    }

    #[test]
    fn system_prompt_names_the_closed_sets() {
        assert!(SYSTEM_PROMPT.contains("critical, high, medium, low, info"));
        assert!(SYSTEM_PROMPT.contains(
            "security, bug, performance, style, maintainability, best-practice"
        ));
    }
}
