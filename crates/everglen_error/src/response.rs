//! Errors raised while interpreting model output.

/// Why a structured response was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ResponseParseErrorKind {
    /// The text is not syntactically valid JSON
    #[display("Response is not valid JSON: {}", _0)]
    InvalidJson(String),
    /// Valid JSON, but a required key is missing or has the wrong type
    #[display("Response JSON does not match the expected shape: {}", _0)]
    SchemaMismatch(String),
}

/// Response interpretation error with source location tracking.
///
/// # Examples
///
/// ```
/// use everglen_error::{ResponseParseError, ResponseParseErrorKind};
///
/// let err = ResponseParseError::new(ResponseParseErrorKind::InvalidJson("EOF".into()));
/// assert!(format!("{}", err).contains("not valid JSON"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Response Parse Error: {} at line {} in {}", kind, line, file)]
pub struct ResponseParseError {
    /// The kind of error that occurred
    pub kind: ResponseParseErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ResponseParseError {
    /// Create a new ResponseParseError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ResponseParseErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
