//! Groq AI LPU Inference API driver using the OpenAI-compatible client.

use crate::{OpenAICompatibleClient, RetryPolicy, api_key_from_env};
use async_trait::async_trait;
use everglen_core::{CompletionConfig, CompletionRequest, CompletionResponse, RetryConfig};
use everglen_error::{CompletionError, CompletionErrorKind, EverglenResult};
use everglen_interface::CompletionDriver;
use tracing::instrument;

const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Groq AI LPU Inference API driver.
#[derive(Debug, Clone)]
pub struct GroqDriver {
    inner: OpenAICompatibleClient,
}

impl GroqDriver {
    /// Creates a new Groq driver.
    ///
    /// Reads API token from `GROQ_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` if the token is not set.
    #[instrument(skip_all, fields(model = %model))]
    pub fn new(model: String) -> EverglenResult<Self> {
        let api_key = std::env::var("GROQ_API_KEY").map_err(|_| {
            CompletionError::new(CompletionErrorKind::MissingApiKey("GROQ_API_KEY".to_string()))
        })?;

        Ok(Self::with_api_key(api_key, model))
    }

    /// Creates a new Groq driver with explicit API key.
    #[instrument(skip(api_key), fields(model = %model))]
    pub fn with_api_key(api_key: String, model: String) -> Self {
        let inner =
            OpenAICompatibleClient::new(api_key, model, GROQ_URL.to_string(), "groq");
        Self { inner }
    }

    /// Creates a driver from the `[completion]` and `[retry]` tables.
    ///
    /// The key is read from the variable named by `api_key_env`, and `url`
    /// may point at any compatible endpoint.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` if the variable is unset or empty.
    #[instrument(skip_all, fields(model = %completion.model, url = %completion.url))]
    pub fn from_config(completion: &CompletionConfig, retry: &RetryConfig) -> EverglenResult<Self> {
        let api_key = api_key_from_env(completion)?;
        let inner = OpenAICompatibleClient::new(
            api_key,
            completion.model.clone(),
            completion.url.clone(),
            "groq",
        )
        .with_retry(RetryPolicy::from(retry));
        Ok(Self { inner })
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.inner = self.inner.with_retry(retry);
        self
    }
}

#[async_trait]
impl CompletionDriver for GroqDriver {
    #[instrument(skip(self, req), fields(provider = "groq", model = %self.inner.model_name()))]
    async fn generate(&self, req: &CompletionRequest) -> EverglenResult<CompletionResponse> {
        Ok(self.inner.generate(req).await?)
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
