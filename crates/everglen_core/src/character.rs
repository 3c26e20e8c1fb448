//! Character profiles.

use crate::CharacterId;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Descriptive attributes of a character, as authored by the user.
///
/// Only name, age, gender and personality are required. Everything else is
/// optional and rendered as empty text in prompts when absent.
///
/// # Examples
///
/// ```
/// use everglen_core::CharacterProfile;
///
/// let max = CharacterProfile::builder()
///     .name("Max Supernova")
///     .age(24)
///     .gender("male")
///     .personality("shy")
///     .high_school_clique("nerd")
///     .native_languages(vec!["English".to_string(), "Polish".to_string()])
///     .build()
///     .unwrap();
///
/// assert_eq!(max.name, "Max Supernova");
/// assert_eq!(max.current_job, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Builder)]
#[builder(setter(into))]
pub struct CharacterProfile {
    /// Display name
    pub name: String,
    /// Age in years
    pub age: i32,
    /// Free-text gender
    pub gender: String,
    /// Free-text personality summary
    pub personality: String,
    /// Social group at Everglen High ("nerd", "bully", ...)
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub high_school_clique: Option<String>,
    /// Cultural background
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub cultural_background: Option<String>,
    /// Native languages, in the order the user listed them
    #[builder(default)]
    #[serde(default)]
    pub native_languages: Vec<String>,
    /// Current job if the character is an adult
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub current_job: Option<String>,
    /// Trademark attire
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub outfit: Option<String>,
    /// Anything that does not fit the other attributes
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub additional_desc: Option<String>,
}

impl CharacterProfile {
    /// Creates a new builder for CharacterProfile.
    pub fn builder() -> CharacterProfileBuilder {
        CharacterProfileBuilder::default()
    }
}

/// A persisted character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Character {
    /// Identifier assigned at creation
    pub id: CharacterId,
    /// Authored attributes
    #[serde(flatten)]
    pub profile: CharacterProfile,
}

impl Character {
    /// Character name.
    pub fn name(&self) -> &str {
        &self.profile.name
    }
}
