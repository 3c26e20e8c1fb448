//! Persistence trait.
//!
//! Implementations can use databases or in-memory structures. All methods are
//! async to support async drivers and network I/O.

use async_trait::async_trait;
use everglen_core::{
    Character, CharacterId, CharacterProfile, NewRelationship, NewSeries, NewStory, Relationship,
    RelationshipId, Series, SeriesId, Story, StoryCharacterLink, StoryId,
};
use everglen_error::EverglenResult;

/// Storage for characters, relationships, series and stories.
///
/// Unknown ids yield `DatabaseErrorKind::NotFound`. Writes that reference a
/// missing character or series yield `DatabaseErrorKind::ForeignKey`.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Store a new character and return it with its assigned id.
    async fn create_character(&self, profile: &CharacterProfile) -> EverglenResult<Character>;

    /// Overwrite every attribute of an existing character.
    async fn update_character(
        &self,
        id: CharacterId,
        profile: &CharacterProfile,
    ) -> EverglenResult<Character>;

    /// Load one character.
    async fn get_character(&self, id: CharacterId) -> EverglenResult<Character>;

    /// All characters ordered by name.
    async fn list_characters(&self) -> EverglenResult<Vec<Character>>;

    /// Store a relationship between two existing characters.
    async fn create_relationship(
        &self,
        relationship: &NewRelationship,
    ) -> EverglenResult<Relationship>;

    /// Overwrite an existing relationship.
    async fn update_relationship(
        &self,
        id: RelationshipId,
        relationship: &NewRelationship,
    ) -> EverglenResult<Relationship>;

    /// Load one relationship.
    async fn get_relationship(&self, id: RelationshipId) -> EverglenResult<Relationship>;

    /// Relationships where the character is subject or object, ordered by id.
    async fn relationships_for_character(
        &self,
        id: CharacterId,
    ) -> EverglenResult<Vec<Relationship>>;

    /// Store a new series.
    async fn create_series(&self, series: &NewSeries) -> EverglenResult<Series>;

    /// Load one series.
    async fn get_series(&self, id: SeriesId) -> EverglenResult<Series>;

    /// All series ordered by id.
    async fn list_series(&self) -> EverglenResult<Vec<Series>>;

    /// Store a new story in an existing series.
    async fn create_story(&self, story: &NewStory) -> EverglenResult<Story>;

    /// Load one story.
    async fn get_story(&self, id: StoryId) -> EverglenResult<Story>;

    /// Stories of a series in episode order.
    async fn list_stories(&self, series_id: SeriesId) -> EverglenResult<Vec<Story>>;

    /// Number of stories already saved in a series.
    async fn count_stories(&self, series_id: SeriesId) -> EverglenResult<i64>;

    /// Record that a character appears in a story.
    async fn link_character(
        &self,
        story_id: StoryId,
        character_id: CharacterId,
    ) -> EverglenResult<StoryCharacterLink>;

    /// Characters appearing in a story, ordered by link id.
    async fn story_characters(&self, story_id: StoryId) -> EverglenResult<Vec<Character>>;
}
