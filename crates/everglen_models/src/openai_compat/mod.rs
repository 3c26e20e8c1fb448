//! Generic OpenAI-compatible API client.
//!
//! Reusable for any provider that follows the OpenAI chat completions format.

mod client;
mod conversions;
mod dto;

pub use client::OpenAICompatibleClient;
pub use dto::{
    ChatChoice, ChatMessage, ChatRequest, ChatRequestBuilder, ChatResponse, ChatUsage,
    JsonResponseFormat,
};
