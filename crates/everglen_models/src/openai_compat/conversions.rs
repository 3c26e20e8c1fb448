//! Type conversions between Everglen and OpenAI formats.

use crate::openai_compat::{ChatMessage, ChatRequest, ChatResponse, JsonResponseFormat};
use everglen_core::{CompletionRequest, CompletionResponse, ResponseFormat, TokenUsage};
use everglen_error::{CompletionError, CompletionErrorKind};

/// Converts a CompletionRequest to OpenAI chat format.
pub fn to_chat_request(req: &CompletionRequest, model: &str) -> Result<ChatRequest, CompletionError> {
    let messages = req
        .messages()
        .iter()
        .map(|msg| ChatMessage {
            role: msg.role.to_string(),
            content: msg.content.clone(),
        })
        .collect::<Vec<_>>();

    let response_format = match req.response_format() {
        ResponseFormat::Text => None,
        ResponseFormat::JsonObject => Some(JsonResponseFormat::json_object()),
    };

    ChatRequest::builder()
        .model(model)
        .messages(messages)
        .temperature(*req.temperature())
        .max_tokens(*req.max_tokens())
        .top_p(*req.top_p())
        .stream(false)
        .stop(req.stop().clone())
        .response_format(response_format)
        .build()
        .map_err(|e| {
            CompletionError::new(CompletionErrorKind::Builder(format!(
                "Failed to build request: {}",
                e
            )))
        })
}

/// Converts an OpenAI chat response to a CompletionResponse.
pub fn from_chat_response(response: ChatResponse) -> Result<CompletionResponse, CompletionError> {
    let usage = response.usage.as_ref().and_then(|u| {
        match (u.prompt_tokens, u.completion_tokens, u.total_tokens) {
            (Some(input), Some(output), Some(total)) => Some(TokenUsage::new(input, output, total)),
            _ => None,
        }
    });

    let content = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| {
            CompletionError::new(CompletionErrorKind::MalformedEnvelope(
                "No choices in response".to_string(),
            ))
        })?;

    let response = CompletionResponse::new(content);
    Ok(match usage {
        Some(usage) => response.with_usage(usage),
        None => response,
    })
}
