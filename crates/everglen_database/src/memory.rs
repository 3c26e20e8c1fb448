//! In-memory implementation of PersistenceGateway.
//!
//! All data is lost when the gateway is dropped. Ids are assigned
//! sequentially from 1 per table.

use async_trait::async_trait;
use everglen_core::{
    Character, CharacterId, CharacterProfile, LinkId, NewRelationship, NewSeries, NewStory,
    Relationship, RelationshipId, Series, SeriesId, Story, StoryCharacterLink, StoryId,
};
use everglen_error::{DatabaseError, DatabaseErrorKind, EverglenResult};
use everglen_interface::PersistenceGateway;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

#[derive(Debug, Default)]
struct Tables {
    characters: BTreeMap<CharacterId, Character>,
    relationships: BTreeMap<RelationshipId, Relationship>,
    series: BTreeMap<SeriesId, Series>,
    stories: BTreeMap<StoryId, Story>,
    links: BTreeMap<LinkId, StoryCharacterLink>,
    next_character: i32,
    next_relationship: i32,
    next_series: i32,
    next_story: i32,
    next_link: i32,
}

fn next(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

impl Tables {
    fn require_character(&self, id: CharacterId) -> Result<(), DatabaseError> {
        if self.characters.contains_key(&id) {
            Ok(())
        } else {
            Err(DatabaseError::new(DatabaseErrorKind::ForeignKey(format!(
                "character {} does not exist",
                id
            ))))
        }
    }
}

/// Gateway backed by ordered maps behind a single lock.
///
/// # Example
/// ```
/// use everglen_database::InMemoryGateway;
/// use everglen_interface::PersistenceGateway;
/// use everglen_core::NewSeries;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let gateway = InMemoryGateway::new();
/// let series = gateway
///     .create_series(&NewSeries {
///         series_name: "Everglen Nights".into(),
///         series_desc: "After-school mysteries".into(),
///     })
///     .await
///     .unwrap();
/// assert_eq!(series.id.get(), 1);
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryGateway {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryGateway {
    /// Create a new empty gateway.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersistenceGateway for InMemoryGateway {
    #[instrument(skip(self, profile), fields(name = %profile.name))]
    async fn create_character(&self, profile: &CharacterProfile) -> EverglenResult<Character> {
        let mut tables = self.tables.write().await;
        let id = CharacterId(next(&mut tables.next_character));
        let character = Character {
            id,
            profile: profile.clone(),
        };
        tables.characters.insert(id, character.clone());
        debug!(%id, "Stored character");
        Ok(character)
    }

    #[instrument(skip(self, profile))]
    async fn update_character(
        &self,
        id: CharacterId,
        profile: &CharacterProfile,
    ) -> EverglenResult<Character> {
        let mut tables = self.tables.write().await;
        let character = tables
            .characters
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::not_found("character", id.get()))?;
        character.profile = profile.clone();
        Ok(character.clone())
    }

    async fn get_character(&self, id: CharacterId) -> EverglenResult<Character> {
        let tables = self.tables.read().await;
        Ok(tables
            .characters
            .get(&id)
            .cloned()
            .ok_or_else(|| DatabaseError::not_found("character", id.get()))?)
    }

    async fn list_characters(&self) -> EverglenResult<Vec<Character>> {
        let tables = self.tables.read().await;
        let mut characters = tables.characters.values().cloned().collect::<Vec<_>>();
        characters.sort_by(|a, b| a.profile.name.cmp(&b.profile.name).then(a.id.cmp(&b.id)));
        Ok(characters)
    }

    #[instrument(skip(self))]
    async fn create_relationship(
        &self,
        relationship: &NewRelationship,
    ) -> EverglenResult<Relationship> {
        let mut tables = self.tables.write().await;
        tables.require_character(relationship.subject)?;
        tables.require_character(relationship.object)?;

        let id = RelationshipId(next(&mut tables.next_relationship));
        let stored = Relationship {
            id,
            subject: relationship.subject,
            object: relationship.object,
            relation: relationship.relation.clone(),
        };
        tables.relationships.insert(id, stored.clone());
        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn update_relationship(
        &self,
        id: RelationshipId,
        relationship: &NewRelationship,
    ) -> EverglenResult<Relationship> {
        let mut tables = self.tables.write().await;
        if !tables.relationships.contains_key(&id) {
            return Err(DatabaseError::not_found("relationship", id.get()).into());
        }
        tables.require_character(relationship.subject)?;
        tables.require_character(relationship.object)?;

        let stored = Relationship {
            id,
            subject: relationship.subject,
            object: relationship.object,
            relation: relationship.relation.clone(),
        };
        tables.relationships.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_relationship(&self, id: RelationshipId) -> EverglenResult<Relationship> {
        let tables = self.tables.read().await;
        Ok(tables
            .relationships
            .get(&id)
            .cloned()
            .ok_or_else(|| DatabaseError::not_found("relationship", id.get()))?)
    }

    async fn relationships_for_character(
        &self,
        id: CharacterId,
    ) -> EverglenResult<Vec<Relationship>> {
        let tables = self.tables.read().await;
        Ok(tables
            .relationships
            .values()
            .filter(|r| r.involves(id))
            .cloned()
            .collect())
    }

    #[instrument(skip(self, series), fields(name = %series.series_name))]
    async fn create_series(&self, series: &NewSeries) -> EverglenResult<Series> {
        let mut tables = self.tables.write().await;
        let id = SeriesId(next(&mut tables.next_series));
        let stored = Series {
            id,
            series_name: series.series_name.clone(),
            series_desc: series.series_desc.clone(),
        };
        tables.series.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_series(&self, id: SeriesId) -> EverglenResult<Series> {
        let tables = self.tables.read().await;
        Ok(tables
            .series
            .get(&id)
            .cloned()
            .ok_or_else(|| DatabaseError::not_found("series", id.get()))?)
    }

    async fn list_series(&self) -> EverglenResult<Vec<Series>> {
        let tables = self.tables.read().await;
        Ok(tables.series.values().cloned().collect())
    }

    #[instrument(skip(self, story), fields(series_id = %story.series_id, episode = story.episode_number))]
    async fn create_story(&self, story: &NewStory) -> EverglenResult<Story> {
        let mut tables = self.tables.write().await;
        if !tables.series.contains_key(&story.series_id) {
            return Err(DatabaseError::new(DatabaseErrorKind::ForeignKey(format!(
                "series {} does not exist",
                story.series_id
            )))
            .into());
        }

        let id = StoryId(next(&mut tables.next_story));
        let stored = Story {
            id,
            series_id: story.series_id,
            story_title: story.story_title.clone(),
            episode_number: story.episode_number,
            location: story.location.clone(),
            plot: story.plot.clone(),
            full_story: story.full_story.clone(),
        };
        tables.stories.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_story(&self, id: StoryId) -> EverglenResult<Story> {
        let tables = self.tables.read().await;
        Ok(tables
            .stories
            .get(&id)
            .cloned()
            .ok_or_else(|| DatabaseError::not_found("story", id.get()))?)
    }

    async fn list_stories(&self, series_id: SeriesId) -> EverglenResult<Vec<Story>> {
        let tables = self.tables.read().await;
        let mut stories = tables
            .stories
            .values()
            .filter(|s| s.series_id == series_id)
            .cloned()
            .collect::<Vec<_>>();
        stories.sort_by_key(|s| (s.episode_number, s.id));
        Ok(stories)
    }

    async fn count_stories(&self, series_id: SeriesId) -> EverglenResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .stories
            .values()
            .filter(|s| s.series_id == series_id)
            .count() as i64)
    }

    async fn link_character(
        &self,
        story_id: StoryId,
        character_id: CharacterId,
    ) -> EverglenResult<StoryCharacterLink> {
        let mut tables = self.tables.write().await;
        if !tables.stories.contains_key(&story_id) {
            return Err(DatabaseError::new(DatabaseErrorKind::ForeignKey(format!(
                "story {} does not exist",
                story_id
            )))
            .into());
        }
        tables.require_character(character_id)?;

        let id = LinkId(next(&mut tables.next_link));
        let link = StoryCharacterLink {
            id,
            story_id,
            character_id,
        };
        tables.links.insert(id, link);
        Ok(link)
    }

    async fn story_characters(&self, story_id: StoryId) -> EverglenResult<Vec<Character>> {
        let tables = self.tables.read().await;
        Ok(tables
            .links
            .values()
            .filter(|l| l.story_id == story_id)
            .filter_map(|l| tables.characters.get(&l.character_id).cloned())
            .collect())
    }
}
