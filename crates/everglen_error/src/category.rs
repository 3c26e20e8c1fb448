//! Coarse failure taxonomy shared by every error type.

/// The four failure categories callers are expected to distinguish.
///
/// # Examples
///
/// ```
/// use everglen_error::FailureCategory;
///
/// assert_eq!(FailureCategory::ResponseParse.as_str(), "response_parse");
/// assert_eq!(format!("{}", FailureCategory::BadRequest), "bad_request");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum FailureCategory {
    /// The completion service rejected the request as malformed or oversized
    #[display("bad_request")]
    BadRequest,
    /// The completion service reported a transient failure
    #[display("service_unavailable")]
    ServiceUnavailable,
    /// The model answered, but not with the JSON shape that was asked for
    #[display("response_parse")]
    ResponseParse,
    /// Anything else (network, persistence, configuration, input validation)
    #[display("other")]
    Other,
}

impl FailureCategory {
    /// Stable identifier used in JSON error payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCategory::BadRequest => "bad_request",
            FailureCategory::ServiceUnavailable => "service_unavailable",
            FailureCategory::ResponseParse => "response_parse",
            FailureCategory::Other => "other",
        }
    }
}
