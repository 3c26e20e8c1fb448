//! Scripted completion driver for testing.

use async_trait::async_trait;
use everglen_core::{CompletionRequest, CompletionResponse, Role};
use everglen_error::{CompletionError, CompletionErrorKind, EverglenResult};
use everglen_interface::CompletionDriver;
use std::sync::{Arc, Mutex};

/// A single scripted response (success or error).
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success(String),
    Error(CompletionErrorKind),
}

impl MockResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Success(text.into())
    }

    pub fn status(status: u16) -> Self {
        Self::Error(CompletionErrorKind::from_status(status, "scripted failure"))
    }
}

/// Mock driver that answers from a script and records every request.
///
/// Calls past the end of the script fail with a malformed-envelope error so a
/// test notices unexpected extra calls.
#[derive(Clone)]
pub struct MockDriver {
    script: Arc<Mutex<Vec<MockResponse>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockDriver {
    /// Create a mock driver with a sequence of responses.
    pub fn new_sequence(responses: Vec<MockResponse>) -> Self {
        Self {
            script: Arc::new(Mutex::new(responses)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock driver that answers each call with the given texts in order.
    pub fn new_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new_sequence(texts.into_iter().map(MockResponse::text).collect())
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of times generate() was called.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// User text of the n-th request.
    #[allow(dead_code)]
    pub fn user_text(&self, n: usize) -> String {
        self.requests()[n].text_for(Role::User)
    }

    /// System text of the n-th request.
    #[allow(dead_code)]
    pub fn system_text(&self, n: usize) -> String {
        self.requests()[n].text_for(Role::System)
    }
}

#[async_trait]
impl CompletionDriver for MockDriver {
    async fn generate(&self, req: &CompletionRequest) -> EverglenResult<CompletionResponse> {
        self.requests.lock().unwrap().push(req.clone());

        let next = {
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                None
            } else {
                Some(script.remove(0))
            }
        };

        match next {
            Some(MockResponse::Success(text)) => Ok(CompletionResponse::new(text)),
            Some(MockResponse::Error(kind)) => Err(CompletionError::new(kind).into()),
            None => Err(CompletionError::new(CompletionErrorKind::MalformedEnvelope(
                "mock script exhausted".to_string(),
            ))
            .into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
