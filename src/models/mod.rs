//! Shared types used across all modules.
//!
//! This module defines the core data structures for review requests,
//! issues, review outcomes, and provider selection. Other modules import
//! from here rather than reaching into each other's internals.

pub mod issue;
pub mod review;

use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

pub use issue::{Category, Issue, Severity};
pub use review::{ParsedReview, ReviewOutcome};

/// A single review request. Built once per invocation and not retained.
///
/// Focus areas keep their insertion order but are deduplicated; an empty
/// set means "review all categories".
#[derive(Debug, Clone)]
pub struct ReviewRequest {
    code: String,
    language: String,
    focus_areas: IndexSet<String>,
    token_budget: usize,
}

impl ReviewRequest {
    /// Build a request. Duplicate focus areas are dropped, keeping the
    /// first occurrence.
    pub fn new(
        code: impl Into<String>,
        language: impl Into<String>,
        focus_areas: impl IntoIterator<Item = String>,
        token_budget: usize,
    ) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
            focus_areas: focus_areas.into_iter().collect(),
            token_budget,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn focus_areas(&self) -> &IndexSet<String> {
        &self.focus_areas
    }

    pub fn token_budget(&self) -> usize {
        self.token_budget
    }
}

/// Supported LLM provider backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderName {
    #[default]
    Gemini,
    Anthropic,
    #[serde(rename = "openai")]
    OpenAI,
    /// Any OpenAI-compatible API (e.g. Ollama, Together, local servers).
    #[serde(rename = "openai-compatible")]
    OpenAICompatible,
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderName::Gemini => write!(f, "gemini"),
            ProviderName::Anthropic => write!(f, "anthropic"),
            ProviderName::OpenAI => write!(f, "openai"),
            ProviderName::OpenAICompatible => write!(f, "openai-compatible"),
        }
    }
}

impl std::str::FromStr for ProviderName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(ProviderName::Gemini),
            "anthropic" => Ok(ProviderName::Anthropic),
            "openai" => Ok(ProviderName::OpenAI),
            "openai-compatible" => Ok(ProviderName::OpenAICompatible),
            other => Err(format!(
                "unsupported provider: '{other}'. Supported: gemini, anthropic, openai, \
                 openai-compatible"
            )),
        }
    }
}

impl ProviderName {
    /// Returns the provider-specific environment variable name for the API key.
    ///
    /// These match the env var names used by rig-core's `from_env()` implementations.
    pub fn api_key_env_var(self) -> &'static str {
        match self {
            ProviderName::Gemini => "GEMINI_API_KEY",
            ProviderName::Anthropic => "ANTHROPIC_API_KEY",
            ProviderName::OpenAI | ProviderName::OpenAICompatible => "OPENAI_API_KEY",
        }
    }
}
