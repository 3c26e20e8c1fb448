//! PostgreSQL implementation of PersistenceGateway.

use crate::connection::{establish_connection, run_migrations};
use crate::models::{
    CharacterRow, CharacterValues, RelationshipRow, RelationshipValues, SeriesRow, SeriesValues,
    StoryCharacterRow, StoryCharacterValues, StoryRow, StoryValues,
};
use crate::schema::{characters, relationships, series, stories, story_characters};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use everglen_core::{
    Character, CharacterId, CharacterProfile, NewRelationship, NewSeries, NewStory, Relationship,
    RelationshipId, Series, SeriesId, Story, StoryCharacterLink, StoryId,
};
use everglen_error::{DatabaseError, EverglenResult};
use everglen_interface::PersistenceGateway;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Gateway over a single shared Diesel connection.
///
/// Queries run synchronously while the connection lock is held.
#[derive(Clone)]
pub struct PostgresGateway {
    conn: Arc<Mutex<PgConnection>>,
}

impl std::fmt::Debug for PostgresGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresGateway").finish_non_exhaustive()
    }
}

impl PostgresGateway {
    /// Wrap an existing connection.
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Connect to `url` (or `DATABASE_URL`) and apply pending migrations.
    #[instrument(skip(url))]
    pub fn connect(url: Option<&str>) -> Result<Self, DatabaseError> {
        let mut conn = establish_connection(url)?;
        run_migrations(&mut conn)?;
        info!("Connected to PostgreSQL and applied migrations");
        Ok(Self::new(conn))
    }
}

#[async_trait]
impl PersistenceGateway for PostgresGateway {
    #[instrument(skip(self, profile), fields(name = %profile.name))]
    async fn create_character(&self, profile: &CharacterProfile) -> EverglenResult<Character> {
        let mut conn = self.conn.lock().await;
        let row: CharacterRow = diesel::insert_into(characters::table)
            .values(CharacterValues::from(profile))
            .returning(CharacterRow::as_returning())
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)?;
        debug!(id = row.id, "Inserted character");
        Ok(row.into())
    }

    #[instrument(skip(self, profile))]
    async fn update_character(
        &self,
        id: CharacterId,
        profile: &CharacterProfile,
    ) -> EverglenResult<Character> {
        let mut conn = self.conn.lock().await;
        let row: CharacterRow = diesel::update(characters::table.find(id.get()))
            .set(CharacterValues::from(profile))
            .returning(CharacterRow::as_returning())
            .get_result(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?
            .ok_or_else(|| DatabaseError::not_found("character", id.get()))?;
        Ok(row.into())
    }

    async fn get_character(&self, id: CharacterId) -> EverglenResult<Character> {
        let mut conn = self.conn.lock().await;
        let row: CharacterRow = characters::table
            .find(id.get())
            .select(CharacterRow::as_select())
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?
            .ok_or_else(|| DatabaseError::not_found("character", id.get()))?;
        Ok(row.into())
    }

    async fn list_characters(&self) -> EverglenResult<Vec<Character>> {
        let mut conn = self.conn.lock().await;
        let rows: Vec<CharacterRow> = characters::table
            .order((characters::character_name.asc(), characters::id.asc()))
            .select(CharacterRow::as_select())
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(rows.into_iter().map(Character::from).collect())
    }

    #[instrument(skip(self))]
    async fn create_relationship(
        &self,
        relationship: &NewRelationship,
    ) -> EverglenResult<Relationship> {
        let mut conn = self.conn.lock().await;
        let row: RelationshipRow = diesel::insert_into(relationships::table)
            .values(RelationshipValues::from(relationship))
            .returning(RelationshipRow::as_returning())
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn update_relationship(
        &self,
        id: RelationshipId,
        relationship: &NewRelationship,
    ) -> EverglenResult<Relationship> {
        let mut conn = self.conn.lock().await;
        let row: RelationshipRow = diesel::update(relationships::table.find(id.get()))
            .set(RelationshipValues::from(relationship))
            .returning(RelationshipRow::as_returning())
            .get_result(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?
            .ok_or_else(|| DatabaseError::not_found("relationship", id.get()))?;
        Ok(row.into())
    }

    async fn get_relationship(&self, id: RelationshipId) -> EverglenResult<Relationship> {
        let mut conn = self.conn.lock().await;
        let row: RelationshipRow = relationships::table
            .find(id.get())
            .select(RelationshipRow::as_select())
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?
            .ok_or_else(|| DatabaseError::not_found("relationship", id.get()))?;
        Ok(row.into())
    }

    async fn relationships_for_character(
        &self,
        id: CharacterId,
    ) -> EverglenResult<Vec<Relationship>> {
        let mut conn = self.conn.lock().await;
        let rows: Vec<RelationshipRow> = relationships::table
            .filter(
                relationships::char_subject_id
                    .eq(id.get())
                    .or(relationships::char_object_id.eq(id.get())),
            )
            .order(relationships::id.asc())
            .select(RelationshipRow::as_select())
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(rows.into_iter().map(Relationship::from).collect())
    }

    #[instrument(skip(self, new_series), fields(name = %new_series.series_name))]
    async fn create_series(&self, new_series: &NewSeries) -> EverglenResult<Series> {
        let mut conn = self.conn.lock().await;
        let row: SeriesRow = diesel::insert_into(series::table)
            .values(SeriesValues::from(new_series))
            .returning(SeriesRow::as_returning())
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(row.into())
    }

    async fn get_series(&self, id: SeriesId) -> EverglenResult<Series> {
        let mut conn = self.conn.lock().await;
        let row: SeriesRow = series::table
            .find(id.get())
            .select(SeriesRow::as_select())
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?
            .ok_or_else(|| DatabaseError::not_found("series", id.get()))?;
        Ok(row.into())
    }

    async fn list_series(&self) -> EverglenResult<Vec<Series>> {
        let mut conn = self.conn.lock().await;
        let rows: Vec<SeriesRow> = series::table
            .order(series::id.asc())
            .select(SeriesRow::as_select())
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(rows.into_iter().map(Series::from).collect())
    }

    #[instrument(skip(self, story), fields(series_id = %story.series_id, episode = story.episode_number))]
    async fn create_story(&self, story: &NewStory) -> EverglenResult<Story> {
        let mut conn = self.conn.lock().await;
        let row: StoryRow = diesel::insert_into(stories::table)
            .values(StoryValues::from(story))
            .returning(StoryRow::as_returning())
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)?;
        debug!(id = row.id, "Inserted story");
        Ok(row.into())
    }

    async fn get_story(&self, id: StoryId) -> EverglenResult<Story> {
        let mut conn = self.conn.lock().await;
        let row: StoryRow = stories::table
            .find(id.get())
            .select(StoryRow::as_select())
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?
            .ok_or_else(|| DatabaseError::not_found("story", id.get()))?;
        Ok(row.into())
    }

    async fn list_stories(&self, series_id: SeriesId) -> EverglenResult<Vec<Story>> {
        let mut conn = self.conn.lock().await;
        let rows: Vec<StoryRow> = stories::table
            .filter(stories::series_id.eq(series_id.get()))
            .order((stories::episode_number.asc(), stories::id.asc()))
            .select(StoryRow::as_select())
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(rows.into_iter().map(Story::from).collect())
    }

    async fn count_stories(&self, series_id: SeriesId) -> EverglenResult<i64> {
        let mut conn = self.conn.lock().await;
        let count = stories::table
            .filter(stories::series_id.eq(series_id.get()))
            .count()
            .get_result::<i64>(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(count)
    }

    async fn link_character(
        &self,
        story_id: StoryId,
        character_id: CharacterId,
    ) -> EverglenResult<StoryCharacterLink> {
        let mut conn = self.conn.lock().await;
        let row: StoryCharacterRow = diesel::insert_into(story_characters::table)
            .values(StoryCharacterValues {
                story_id: story_id.get(),
                char_id: character_id.get(),
            })
            .returning(StoryCharacterRow::as_returning())
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(row.into())
    }

    async fn story_characters(&self, story_id: StoryId) -> EverglenResult<Vec<Character>> {
        let mut conn = self.conn.lock().await;
        let rows: Vec<CharacterRow> = story_characters::table
            .inner_join(characters::table)
            .filter(story_characters::story_id.eq(story_id.get()))
            .order(story_characters::id.asc())
            .select(CharacterRow::as_select())
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(rows.into_iter().map(Character::from).collect())
    }
}
