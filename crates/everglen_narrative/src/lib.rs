//! Story generation for Everglen.
//!
//! - [`prompt`] assembles chat messages from domain data.
//! - [`interpret`] turns model text into typed results.
//! - [`NarrativePipeline`] runs one operation against a [`CompletionDriver`].
//! - [`StoryLibrary`] loads context from a [`PersistenceGateway`], runs the
//!   pipeline and saves stories.
//!
//! [`CompletionDriver`]: everglen_interface::CompletionDriver
//! [`PersistenceGateway`]: everglen_interface::PersistenceGateway

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod interpret;
mod library;
mod outcome;
mod pipeline;
pub mod prompt;

pub use library::{GenerateStory, SaveStory, StoryLibrary, StoryOrigin};
pub use outcome::SequentialOutcome;
pub use pipeline::{GeneratedStory, NarrativePipeline};
