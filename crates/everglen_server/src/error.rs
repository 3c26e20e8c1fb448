//! Mapping of engine errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use everglen_error::{
    DatabaseErrorKind, EverglenError, EverglenErrorKind, FailureCategory, FormError,
};
use serde_json::json;
use tracing::{error, warn};

/// An error returned from a handler, optionally tagged with the pipeline step
/// that failed.
#[derive(Debug)]
pub struct ApiError {
    error: EverglenError,
    stage: Option<&'static str>,
}

impl ApiError {
    /// Tag the error with the step that produced it.
    pub fn at_stage(error: EverglenError, stage: &'static str) -> Self {
        Self {
            error,
            stage: Some(stage),
        }
    }

    /// HTTP status for the wrapped error.
    pub fn status(&self) -> StatusCode {
        match self.error.kind() {
            EverglenErrorKind::Form(_) | EverglenErrorKind::Narrative(_) => {
                StatusCode::BAD_REQUEST
            }
            EverglenErrorKind::Database(db) => match db.kind {
                DatabaseErrorKind::NotFound { .. } => StatusCode::NOT_FOUND,
                DatabaseErrorKind::ForeignKey(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            _ => match self.error.category() {
                FailureCategory::BadRequest | FailureCategory::ResponseParse => {
                    StatusCode::BAD_GATEWAY
                }
                FailureCategory::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                FailureCategory::Other => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<EverglenError> for ApiError {
    fn from(error: EverglenError) -> Self {
        Self { error, stage: None }
    }
}

impl From<FormError> for ApiError {
    fn from(error: FormError) -> Self {
        Self::from(EverglenError::from(error))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = %status, stage = ?self.stage, error = %self.error, "Request failed");
        } else {
            warn!(status = %status, error = %self.error, "Request rejected");
        }

        let mut body = json!({
            "error": self.error.message(),
            "category": self.error.category().as_str(),
        });
        if let Some(stage) = self.stage {
            body["stage"] = json!(stage);
        }
        (status, Json(body)).into_response()
    }
}
