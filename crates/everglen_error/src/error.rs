//! Top-level error wrapper types.

use crate::{
    CompletionError, ConfigError, DatabaseError, FailureCategory, FormError, HttpError,
    NarrativeError, ResponseParseError,
};

/// Every error the workspace can raise.
///
/// # Examples
///
/// ```
/// use everglen_error::{EverglenError, ConfigError};
///
/// let err: EverglenError = ConfigError::new("bad bind address").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum EverglenErrorKind {
    /// Completion service error
    #[from(CompletionError)]
    Completion(CompletionError),
    /// Structured response rejected
    #[from(ResponseParseError)]
    ResponseParse(ResponseParseError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Persistence error
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Form decoding error
    #[from(FormError)]
    Form(FormError),
    /// Narrative pipeline error
    #[from(NarrativeError)]
    Narrative(NarrativeError),
    /// HTTP serving error
    #[from(HttpError)]
    Http(HttpError),
}

/// Everglen error with kind discrimination.
///
/// # Examples
///
/// ```
/// use everglen_error::{EverglenResult, DatabaseError, FailureCategory};
///
/// fn lookup() -> EverglenResult<()> {
///     Err(DatabaseError::not_found("character", 3))?
/// }
///
/// let err = lookup().unwrap_err();
/// assert_eq!(err.category(), FailureCategory::Other);
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Everglen Error: {}", _0)]
pub struct EverglenError(Box<EverglenErrorKind>);

impl EverglenError {
    /// Create a new error from a kind.
    pub fn new(kind: EverglenErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &EverglenErrorKind {
        &self.0
    }

    /// Description of the failure without its source location.
    pub fn message(&self) -> String {
        match self.kind() {
            EverglenErrorKind::Completion(e) => e.kind.to_string(),
            EverglenErrorKind::ResponseParse(e) => e.kind.to_string(),
            EverglenErrorKind::Config(e) => e.message.clone(),
            EverglenErrorKind::Database(e) => e.kind.to_string(),
            EverglenErrorKind::Form(e) => e.kind.to_string(),
            EverglenErrorKind::Narrative(e) => e.kind.to_string(),
            EverglenErrorKind::Http(e) => e.message.clone(),
        }
    }

    /// Coarse category used to pick user-visible behavior.
    pub fn category(&self) -> FailureCategory {
        match self.kind() {
            EverglenErrorKind::Completion(e) => e.kind.category(),
            EverglenErrorKind::ResponseParse(_) => FailureCategory::ResponseParse,
            _ => FailureCategory::Other,
        }
    }
}

// Generic From implementation for any type that converts to EverglenErrorKind
impl<T> From<T> for EverglenError
where
    T: Into<EverglenErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Everglen operations.
pub type EverglenResult<T> = std::result::Result<T, EverglenError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompletionErrorKind, ResponseParseErrorKind};

    #[test]
    fn test_categories_follow_taxonomy() {
        let bad: EverglenError = CompletionError::new(CompletionErrorKind::from_status(400, "x")).into();
        assert_eq!(bad.category(), FailureCategory::BadRequest);

        let down: EverglenError = CompletionError::new(CompletionErrorKind::from_status(502, "x")).into();
        assert_eq!(down.category(), FailureCategory::ServiceUnavailable);

        let parse: EverglenError =
            ResponseParseError::new(ResponseParseErrorKind::SchemaMismatch("title".into())).into();
        assert_eq!(parse.category(), FailureCategory::ResponseParse);

        let net: EverglenError = CompletionError::new(CompletionErrorKind::Http("reset".into())).into();
        assert_eq!(net.category(), FailureCategory::Other);
    }

    #[test]
    fn test_message_omits_location() {
        let err: EverglenError = DatabaseError::not_found("character", 7).into();
        assert_eq!(err.message(), "character 7 not found");
        assert!(err.to_string().contains(" at line "));

        let err: EverglenError = ConfigError::new("bad bind address").into();
        assert_eq!(err.message(), "bad bind address");
    }

    #[test]
    fn test_only_transient_kinds_retry() {
        assert!(CompletionErrorKind::from_status(503, "").is_retryable());
        assert!(CompletionErrorKind::from_status(429, "").is_retryable());
        assert!(!CompletionErrorKind::from_status(400, "").is_retryable());
        assert!(!CompletionErrorKind::from_status(401, "").is_retryable());
        assert!(!CompletionErrorKind::MissingApiKey("GROQ_API_KEY".into()).is_retryable());
    }
}
