//! Core data types for the Everglen story engine.
//!
//! This crate holds the domain model shared by every other crate: characters,
//! relationships, series and stories as persisted, the ephemeral prompt context
//! assembled before a completion call, the completion request/response types,
//! the structured results the model is asked to return, and the layered
//! configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod character;
mod completion;
mod config;
mod context;
mod ids;
mod logging;
mod relationship;
mod results;
mod series;

pub use character::{Character, CharacterProfile, CharacterProfileBuilder};
pub use completion::{
    CompletionRequest, CompletionRequestBuilder, CompletionResponse, Message, ResponseFormat,
    Role, TokenUsage,
};
pub use config::{
    CompletionConfig, DatabaseConfig, DefaultsConfig, EverglenConfig, RetryConfig,
    SamplingConfig, ServerConfig,
};
pub use context::{PromptContext, PromptContextBuilder, RelationshipBrief};
pub use ids::{CharacterId, LinkId, RelationshipId, SeriesId, StoryId};
pub use logging::init_logging;
pub use relationship::{NewRelationship, Relationship};
pub use results::{ExtractedCharacter, PlotHoleReport, StoryOutline};
pub use series::{NewSeries, NewStory, Series, Story, StoryCharacterLink};
