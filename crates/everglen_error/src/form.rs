//! Errors raised while decoding form-encoded request bodies.

/// Form decoding and validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum FormErrorKind {
    /// Body is not valid UTF-8
    #[display("Form body is not valid UTF-8: {}", _0)]
    Encoding(String),
    /// A required field is absent or blank
    #[display("Missing required field '{}'", _0)]
    MissingField(String),
    /// A field expected to be a leaf value is a nested group, or vice versa
    #[display("Field '{}' has the wrong shape", _0)]
    WrongShape(String),
    /// A field could not be parsed as an integer
    #[display("Field '{}' is not an integer: '{}'", field, value)]
    InvalidInteger {
        /// Field path
        field: String,
        /// Offending value
        value: String,
    },
    /// A field holds a value outside its allowed set
    #[display("Field '{}' has unsupported value '{}'", field, value)]
    InvalidValue {
        /// Field path
        field: String,
        /// Offending value
        value: String,
    },
}

/// Form error with source location tracking.
///
/// # Examples
///
/// ```
/// use everglen_error::{FormError, FormErrorKind};
///
/// let err = FormError::new(FormErrorKind::MissingField("series[id]".into()));
/// assert!(format!("{}", err).contains("series[id]"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Form Error: {} at line {} in {}", kind, line, file)]
pub struct FormError {
    /// The kind of error that occurred
    pub kind: FormErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl FormError {
    /// Create a new FormError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: FormErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
