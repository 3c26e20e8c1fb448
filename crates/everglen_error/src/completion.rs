//! Completion service errors and retry classification.

use crate::FailureCategory;

/// Failure conditions raised while talking to the completion service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum CompletionErrorKind {
    /// API key environment variable is not set
    #[display("{} environment variable not set", _0)]
    MissingApiKey(String),
    /// Service rejected the request as malformed or oversized (400, 413, 422)
    #[display("Bad request ({}): {}", status, message)]
    BadRequest {
        /// HTTP status code
        status: u16,
        /// Message returned by the service
        message: String,
    },
    /// Service-side transient failure (500, 502, 503, 504)
    #[display("Service unavailable ({}): {}", status, message)]
    ServiceUnavailable {
        /// HTTP status code
        status: u16,
        /// Message returned by the service
        message: String,
    },
    /// Too many requests (429)
    #[display("Rate limited: {}", _0)]
    RateLimited(String),
    /// Any other non-success status
    #[display("API error ({}): {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Message returned by the service
        message: String,
    },
    /// Transport-level failure (connection refused, timeout, TLS)
    #[display("HTTP transport error: {}", _0)]
    Http(String),
    /// Response envelope could not be decoded or carried no choices
    #[display("Malformed completion envelope: {}", _0)]
    MalformedEnvelope(String),
    /// Request could not be assembled
    #[display("Request build error: {}", _0)]
    Builder(String),
}

impl CompletionErrorKind {
    /// Classify an HTTP status code returned by the service.
    ///
    /// # Examples
    ///
    /// ```
    /// use everglen_error::CompletionErrorKind;
    ///
    /// let kind = CompletionErrorKind::from_status(413, "prompt too long");
    /// assert!(matches!(kind, CompletionErrorKind::BadRequest { status: 413, .. }));
    ///
    /// let kind = CompletionErrorKind::from_status(503, "overloaded");
    /// assert!(kind.is_retryable());
    /// ```
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 | 413 | 422 => CompletionErrorKind::BadRequest { status, message },
            429 => CompletionErrorKind::RateLimited(message),
            500 | 502 | 503 | 504 => CompletionErrorKind::ServiceUnavailable { status, message },
            _ => CompletionErrorKind::Api { status, message },
        }
    }

    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CompletionErrorKind::ServiceUnavailable { .. }
                | CompletionErrorKind::RateLimited(_)
                | CompletionErrorKind::Http(_)
        )
    }

    /// Map onto the shared failure taxonomy.
    pub fn category(&self) -> FailureCategory {
        match self {
            CompletionErrorKind::BadRequest { .. } => FailureCategory::BadRequest,
            CompletionErrorKind::ServiceUnavailable { .. } => FailureCategory::ServiceUnavailable,
            _ => FailureCategory::Other,
        }
    }
}

/// Completion service error with source location tracking.
///
/// # Examples
///
/// ```
/// use everglen_error::{CompletionError, CompletionErrorKind};
///
/// let err = CompletionError::new(CompletionErrorKind::Http("connection reset".into()));
/// assert!(err.is_retryable());
/// assert!(format!("{}", err).contains("connection reset"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Completion Error: {} at line {} in {}", kind, line, file)]
pub struct CompletionError {
    /// The kind of error that occurred
    pub kind: CompletionErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl CompletionError {
    /// Create a new CompletionError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CompletionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether the retry policy should try again.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
