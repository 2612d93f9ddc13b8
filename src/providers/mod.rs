//! ModelProvider trait and LLM integration.
//!
//! Provides an abstraction layer over rig-core to decouple the
//! codebase from the specific LLM library.

pub mod rig;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the model provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("LLM API error: {0}")]
    ApiError(String),

    #[error("empty response from model")]
    EmptyResponse,

    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

/// Trait for LLM completion backends.
///
/// Implementations handle client construction and the raw completion
/// call; prompt building and response parsing live with the caller.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Send a prompt to the model and return the raw response text.
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ProviderError>;
}
