//! Generic client for OpenAI-compatible APIs.

use crate::RetryPolicy;
use async_trait::async_trait;
use crate::openai_compat::{ChatRequest, ChatResponse, conversions};
use everglen_core::{CompletionRequest, CompletionResponse};
use everglen_error::{CompletionError, CompletionErrorKind, EverglenResult};
use everglen_interface::CompletionDriver;
use reqwest::Client;
use tracing::{debug, error, instrument};

/// Generic client for any OpenAI-compatible API.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    provider_name: &'static str,
    retry: RetryPolicy,
}

impl OpenAICompatibleClient {
    /// Creates a new OpenAI-compatible client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - API key for authentication
    /// * `model` - Model identifier
    /// * `base_url` - Chat completions endpoint
    /// * `provider_name` - Name of the provider (for logging/tracing)
    #[instrument(skip(api_key), fields(provider = provider_name, model = %model))]
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        provider_name: &'static str,
    ) -> Self {
        debug!(
            provider = provider_name,
            model = %model,
            url = %base_url,
            "Created OpenAI-compatible client"
        );

        Self {
            client: Client::new(),
            api_key,
            model,
            base_url,
            provider_name,
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Generates a response, retrying transient failures.
    ///
    /// # Errors
    ///
    /// Returns the last `CompletionError` once retries are exhausted, or the
    /// first non-retryable one.
    #[instrument(skip(self, req), fields(provider = self.provider_name, model = %self.model))]
    pub async fn generate(
        &self,
        req: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        let chat_request = conversions::to_chat_request(req, &self.model)?;

        debug!(
            provider = self.provider_name,
            model = %self.model,
            message_count = chat_request.messages().len(),
            temperature = chat_request.temperature(),
            json_mode = chat_request.response_format().is_some(),
            "Sending request"
        );

        let response = self.retry.run(|| self.send_once(&chat_request)).await?;
        conversions::from_chat_response(response)
    }

    async fn send_once(&self, chat_request: &ChatRequest) -> Result<ChatResponse, CompletionError> {
        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(chat_request)
            .send()
            .await
            .map_err(|e| {
                error!(provider = self.provider_name, error = ?e, "HTTP request failed");
                CompletionError::new(CompletionErrorKind::Http(format!("Request failed: {}", e)))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(
                provider = self.provider_name,
                status = %status,
                error = %error_text,
                "API error"
            );
            return Err(CompletionError::new(CompletionErrorKind::from_status(
                status.as_u16(),
                error_text,
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(provider = self.provider_name, error = ?e, "Failed to parse response");
            CompletionError::new(CompletionErrorKind::MalformedEnvelope(format!(
                "Failed to parse JSON: {}",
                e
            )))
        })?;

        debug!(
            provider = self.provider_name,
            choices = chat_response.choices.len(),
            "Received response"
        );

        Ok(chat_response)
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &'static str {
        self.provider_name
    }

    /// Returns the model name.
    pub fn model_name(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionDriver for OpenAICompatibleClient {
    async fn generate(&self, req: &CompletionRequest) -> EverglenResult<CompletionResponse> {
        Ok(OpenAICompatibleClient::generate(self, req).await?)
    }

    fn provider_name(&self) -> &'static str {
        OpenAICompatibleClient::provider_name(self)
    }

    fn model_name(&self) -> &str {
        OpenAICompatibleClient::model_name(self)
    }
}
