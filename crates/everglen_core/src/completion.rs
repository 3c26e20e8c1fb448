//! Provider-neutral chat completion request and response types.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// Instruction framing the conversation
    System,
    /// End-user turn
    User,
    /// Model turn
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    /// Message author
    pub role: Role,
    /// Message text
    pub content: String,
}

impl Message {
    /// System message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// User message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Output mode requested from the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseFormat {
    /// Unconstrained prose
    #[default]
    Text,
    /// The model must emit a single JSON object
    JsonObject,
}

/// A chat completion request, independent of any provider wire format.
///
/// # Examples
///
/// ```
/// use everglen_core::{CompletionRequest, Message, ResponseFormat};
///
/// let request = CompletionRequest::builder()
///     .messages(vec![Message::system("You are helpful"), Message::user("Hi")])
///     .temperature(0.8)
///     .response_format(ResponseFormat::JsonObject)
///     .build()
///     .unwrap();
///
/// assert_eq!(*request.max_tokens(), 1024);
/// assert_eq!(*request.top_p(), 1.0);
/// assert!(request.stop().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, Builder)]
#[builder(setter(into))]
pub struct CompletionRequest {
    /// Ordered conversation
    messages: Vec<Message>,
    /// Sampling temperature
    temperature: f32,
    /// Upper bound on generated tokens
    #[builder(default = "1024")]
    max_tokens: u32,
    /// Nucleus sampling mass
    #[builder(default = "1.0")]
    top_p: f32,
    /// Stop sequence
    #[builder(default, setter(strip_option))]
    stop: Option<String>,
    /// Requested output mode
    #[builder(default)]
    response_format: ResponseFormat,
}

impl CompletionRequest {
    /// Creates a new builder for CompletionRequest.
    pub fn builder() -> CompletionRequestBuilder {
        CompletionRequestBuilder::default()
    }

    /// Whether the model is asked for a JSON object.
    pub fn expects_json(&self) -> bool {
        self.response_format == ResponseFormat::JsonObject
    }

    /// Concatenated text of every message with the given role.
    pub fn text_for(&self, role: Role) -> String {
        self.messages
            .iter()
            .filter(|m| m.role == role)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Token accounting reported by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct TokenUsage {
    /// Prompt tokens
    prompt_tokens: u32,
    /// Generated tokens
    completion_tokens: u32,
    /// Sum of both
    total_tokens: u32,
}

impl TokenUsage {
    /// Creates a usage record.
    pub fn new(prompt_tokens: u32, completion_tokens: u32, total_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens,
        }
    }
}

/// Text of the first choice plus optional usage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct CompletionResponse {
    /// Generated text
    text: String,
    /// Token usage if the service reported it
    usage: Option<TokenUsage>,
}

impl CompletionResponse {
    /// Response with text and no usage.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }

    /// Attach usage.
    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Consume and return the text.
    pub fn into_text(self) -> String {
        self.text
    }
}
