//! Completion provider integrations for Everglen.
//!
//! [`OpenAICompatibleClient`] speaks the OpenAI chat completions format and
//! classifies failures into [`everglen_error::CompletionErrorKind`].
//! [`GroqDriver`] wraps it for Groq. Every call goes through the same
//! [`RetryPolicy`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod groq;
mod openai_compat;
mod retry;

pub use groq::GroqDriver;
pub use openai_compat::{
    ChatChoice, ChatMessage, ChatRequest, ChatRequestBuilder, ChatResponse, ChatUsage,
    JsonResponseFormat, OpenAICompatibleClient,
};
pub use retry::RetryPolicy;

use everglen_core::CompletionConfig;
use everglen_error::{CompletionError, CompletionErrorKind, EverglenResult};

/// Read the API key named by the completion config.
///
/// # Errors
///
/// Returns `MissingApiKey` if the variable is unset or empty.
pub fn api_key_from_env(config: &CompletionConfig) -> EverglenResult<String> {
    match std::env::var(&config.api_key_env) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(CompletionError::new(CompletionErrorKind::MissingApiKey(
            config.api_key_env.clone(),
        ))
        .into()),
    }
}
