//! Completion backend trait.

use async_trait::async_trait;
use everglen_core::{CompletionRequest, CompletionResponse};
use everglen_error::EverglenResult;

/// Core trait that every completion backend implements.
#[async_trait]
pub trait CompletionDriver: Send + Sync {
    /// Send one chat completion and return the first choice's text.
    ///
    /// Implementations apply their retry policy internally, so a returned
    /// error is final.
    async fn generate(&self, req: &CompletionRequest) -> EverglenResult<CompletionResponse>;

    /// Provider name (e.g., "groq").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "llama-3.3-70b-versatile").
    fn model_name(&self) -> &str;
}
