//! Data transfer objects for OpenAI-compatible APIs.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A message in the OpenAI chat format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,
    /// Message content
    pub content: String,
}

/// The `response_format` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonResponseFormat {
    /// Always "json_object"
    #[serde(rename = "type")]
    pub kind: String,
}

impl JsonResponseFormat {
    /// JSON mode.
    pub fn json_object() -> Self {
        Self {
            kind: "json_object".to_string(),
        }
    }
}

/// OpenAI chat completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ChatRequest {
    /// Model identifier
    model: String,
    /// Conversation messages
    messages: Vec<ChatMessage>,
    /// Sampling temperature
    temperature: f32,
    /// Maximum tokens to generate
    max_tokens: u32,
    /// Nucleus sampling mass
    top_p: f32,
    /// Enable streaming
    #[builder(default)]
    stream: bool,
    /// Stop sequence, serialized as null when absent
    #[builder(default)]
    stop: Option<String>,
    /// Output mode
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<JsonResponseFormat>,
}

impl ChatRequest {
    /// Creates a new builder for ChatRequest.
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }
}

/// A choice in the OpenAI response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// The message content
    pub message: ChatMessage,
    /// Reason for finishing
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage statistics.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatUsage {
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_tokens: Option<u32>,
    /// Tokens in the completion
    #[serde(default)]
    pub completion_tokens: Option<u32>,
    /// Total tokens
    #[serde(default)]
    pub total_tokens: Option<u32>,
}

/// OpenAI chat completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Response choices
    pub choices: Vec<ChatChoice>,
    /// Token usage
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}
