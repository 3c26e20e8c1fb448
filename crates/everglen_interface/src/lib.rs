//! Trait definitions for the Everglen story engine.
//!
//! The narrative layer talks to the outside world through two seams: a
//! [`CompletionDriver`] for the language model and a [`PersistenceGateway`]
//! for stored characters, relationships, series and stories. Both are injected
//! as trait objects so tests can substitute scripted implementations.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod driver;
mod gateway;

pub use driver::CompletionDriver;
pub use gateway::PersistenceGateway;
