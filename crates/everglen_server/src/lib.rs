//! HTTP surface for the Everglen story engine.
//!
//! Form-encoded requests are decoded into a [`FormTree`], validated into typed
//! request structs and dispatched to the [`StoryLibrary`] or the persistence
//! gateway. Errors are reported as JSON with a status derived from their kind.
//!
//! [`StoryLibrary`]: everglen_narrative::StoryLibrary

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod error;
mod form;
pub mod requests;

pub use api::{AppState, create_router};
pub use error::ApiError;
pub use form::FormTree;
