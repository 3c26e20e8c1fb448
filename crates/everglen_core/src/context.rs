//! Ephemeral prompt context assembled per request.

use crate::CharacterProfile;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// A relationship resolved to character names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipBrief {
    /// Name of the subject character
    pub subject: String,
    /// Name of the object character
    pub object: String,
    /// Free-text label
    pub relation: String,
}

impl RelationshipBrief {
    /// Creates a brief.
    pub fn new(
        subject: impl Into<String>,
        object: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            object: object.into(),
            relation: relation.into(),
        }
    }
}

impl std::fmt::Display for RelationshipBrief {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} and {} are {}", self.subject, self.object, self.relation)
    }
}

/// Everything the prompt builder needs for story generation.
///
/// Rebuilt from persisted state for every request.
///
/// # Examples
///
/// ```
/// use everglen_core::PromptContext;
///
/// let ctx = PromptContext::builder()
///     .scenario("Homecoming dance")
///     .build()
///     .unwrap();
///
/// assert_eq!(ctx.language, "English");
/// assert_eq!(ctx.continuity, "usual");
/// assert!(ctx.characters.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(setter(into))]
pub struct PromptContext {
    /// Cast of the story
    #[builder(default)]
    pub characters: Vec<CharacterProfile>,
    /// Relationships among the cast
    #[builder(default)]
    pub relationships: Vec<RelationshipBrief>,
    /// User-supplied premise
    pub scenario: String,
    /// Title of the owning series
    #[builder(default, setter(strip_option))]
    pub series_title: Option<String>,
    /// Requested story title
    #[builder(default, setter(strip_option))]
    pub story_title: Option<String>,
    /// Requested location
    #[builder(default, setter(strip_option))]
    pub location: Option<String>,
    /// Full text of the story this one continues
    #[builder(default, setter(strip_option))]
    pub previous_story: Option<String>,
    /// How strictly to continue the previous story
    #[builder(default = "String::from(\"usual\")")]
    pub continuity: String,
    /// Output language
    #[builder(default = "String::from(\"English\")")]
    pub language: String,
}

impl PromptContext {
    /// Creates a new builder for PromptContext.
    pub fn builder() -> PromptContextBuilder {
        PromptContextBuilder::default()
    }
}
