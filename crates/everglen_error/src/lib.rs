//! Error types for the Everglen story engine.
//!
//! # Error Hierarchy
//!
//! Every error follows the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum names the specific condition
//! - `*Error` struct wraps the kind with the source location that raised it
//! - constructors use `#[track_caller]` so the location is captured automatically
//!
//! All of them fold into [`EverglenError`], which reports a coarse
//! [`FailureCategory`] used by the HTTP surface to pick a status code.
//!
//! # Examples
//!
//! ```
//! use everglen_error::{CompletionError, CompletionErrorKind, EverglenResult, FailureCategory};
//!
//! fn call_model() -> EverglenResult<String> {
//!     Err(CompletionError::new(CompletionErrorKind::ServiceUnavailable {
//!         status: 503,
//!         message: "over capacity".to_string(),
//!     }))?
//! }
//!
//! let err = call_model().unwrap_err();
//! assert_eq!(err.category(), FailureCategory::ServiceUnavailable);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod category;
mod completion;
mod config;
mod database;
mod error;
mod form;
mod http;
mod narrative;
mod response;

pub use category::FailureCategory;
pub use completion::{CompletionError, CompletionErrorKind};
pub use config::ConfigError;
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{EverglenError, EverglenErrorKind, EverglenResult};
pub use form::{FormError, FormErrorKind};
pub use http::HttpError;
pub use narrative::{NarrativeError, NarrativeErrorKind};
pub use response::{ResponseParseError, ResponseParseErrorKind};
