//! Story workflows over the persistence gateway.

use crate::outcome::SequentialOutcome;
use crate::pipeline::{GeneratedStory, NarrativePipeline};
use everglen_core::{
    CharacterId, CharacterProfile, DefaultsConfig, NewStory, PromptContext, RelationshipBrief,
    SeriesId, Story, StoryId,
};
use everglen_error::{DatabaseError, DatabaseErrorKind, EverglenResult};
use everglen_interface::PersistenceGateway;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Parameters for generating a new story in a series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateStory {
    /// Series the story belongs to; its name becomes the series title
    pub series_id: SeriesId,
    /// User premise
    pub scenario: String,
    /// Cast
    pub character_ids: Vec<CharacterId>,
    /// Requested title
    pub story_title: Option<String>,
    /// Requested location
    pub location: Option<String>,
    /// Story this one continues
    pub previous_story_id: Option<StoryId>,
    /// Continuity mode, defaults to the configured one
    pub continuity: Option<String>,
    /// Output language, defaults to the configured one
    pub language: Option<String>,
}

/// How the text of a story being saved came to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryOrigin {
    /// Produced by the generate flow; metadata is already known
    GeneratedFromPlot {
        /// Title
        title: String,
        /// Plot summary
        plot: String,
        /// Location
        location: String,
    },
    /// Written elsewhere; title, plot and location are derived by the model
    Imported,
}

/// Parameters for saving a story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveStory {
    /// Owning series
    pub series_id: SeriesId,
    /// Characters appearing in the story
    pub character_ids: Vec<CharacterId>,
    /// Full prose, stored as given
    pub full_story: String,
    /// Where the metadata comes from
    pub origin: StoryOrigin,
}

/// Loads prompt context from storage, runs the pipeline and saves results.
#[derive(Clone)]
pub struct StoryLibrary {
    gateway: Arc<dyn PersistenceGateway>,
    pipeline: NarrativePipeline,
    defaults: DefaultsConfig,
}

impl std::fmt::Debug for StoryLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryLibrary")
            .field("pipeline", &self.pipeline)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl StoryLibrary {
    /// Creates a library.
    pub fn new(
        gateway: Arc<dyn PersistenceGateway>,
        pipeline: NarrativePipeline,
        defaults: DefaultsConfig,
    ) -> Self {
        Self {
            gateway,
            pipeline,
            defaults,
        }
    }

    /// The underlying pipeline.
    pub fn pipeline(&self) -> &NarrativePipeline {
        &self.pipeline
    }

    /// The underlying gateway.
    pub fn gateway(&self) -> &Arc<dyn PersistenceGateway> {
        &self.gateway
    }

    /// Load a cast and every relationship touching it, resolved to names.
    ///
    /// A relationship shared by two cast members appears once.
    #[instrument(skip(self))]
    pub async fn cast(
        &self,
        character_ids: &[CharacterId],
    ) -> EverglenResult<(Vec<CharacterProfile>, Vec<RelationshipBrief>)> {
        let mut names = HashMap::new();
        let mut profiles = Vec::with_capacity(character_ids.len());
        let mut relationships = BTreeMap::new();

        for id in character_ids {
            let character = self.gateway.get_character(*id).await?;
            names.insert(character.id, character.profile.name.clone());
            profiles.push(character.profile);

            for relationship in self.gateway.relationships_for_character(*id).await? {
                relationships.insert(relationship.id, relationship);
            }
        }

        let mut briefs = Vec::with_capacity(relationships.len());
        for relationship in relationships.into_values() {
            let subject = self.name_of(&mut names, relationship.subject).await?;
            let object = self.name_of(&mut names, relationship.object).await?;
            briefs.push(RelationshipBrief::new(subject, object, relationship.relation));
        }

        Ok((profiles, briefs))
    }

    async fn name_of(
        &self,
        names: &mut HashMap<CharacterId, String>,
        id: CharacterId,
    ) -> EverglenResult<String> {
        if let Some(name) = names.get(&id) {
            return Ok(name.clone());
        }
        let name = self.gateway.get_character(id).await?.profile.name;
        names.insert(id, name.clone());
        Ok(name)
    }

    /// Prompt context for a cast and scenario with configured defaults.
    pub async fn prompt_context_for(
        &self,
        character_ids: &[CharacterId],
        scenario: &str,
    ) -> EverglenResult<PromptContext> {
        let (characters, relationships) = self.cast(character_ids).await?;
        Ok(PromptContext {
            characters,
            relationships,
            scenario: scenario.to_string(),
            series_title: None,
            story_title: None,
            location: None,
            previous_story: None,
            continuity: self.defaults.continuity.clone(),
            language: self.defaults.language.clone(),
        })
    }

    /// Generate and expand a story for a series. Nothing is saved.
    #[instrument(skip(self, request), fields(series_id = %request.series_id, cast = request.character_ids.len()))]
    pub async fn generate(&self, request: &GenerateStory) -> EverglenResult<GeneratedStory> {
        let series = self.gateway.get_series(request.series_id).await?;
        let mut ctx = self
            .prompt_context_for(&request.character_ids, &request.scenario)
            .await?;

        ctx.series_title = Some(series.series_name);
        ctx.story_title = request.story_title.clone();
        ctx.location = request.location.clone();
        if let Some(previous) = request.previous_story_id {
            ctx.previous_story = Some(self.gateway.get_story(previous).await?.full_story);
        }
        if let Some(continuity) = &request.continuity {
            ctx.continuity = continuity.clone();
        }
        if let Some(language) = &request.language {
            ctx.language = language.clone();
        }

        self.pipeline.generate_and_expand(&ctx).await
    }

    /// Rewrite a story with the cast as background.
    #[instrument(skip(self, story), fields(story_len = story.len()))]
    pub async fn humanize(
        &self,
        story: &str,
        character_ids: &[CharacterId],
    ) -> EverglenResult<SequentialOutcome<String, String>> {
        let (characters, relationships) = self.cast(character_ids).await?;
        Ok(self
            .pipeline
            .humanize_story(story, &characters, &relationships)
            .await)
    }

    /// Save a story as the next episode of its series and link its cast.
    ///
    /// Imported stories get their title from a humanize pass and their plot and
    /// location from a summarize pass; both must complete or nothing is saved.
    #[instrument(skip(self, request), fields(series_id = %request.series_id, cast = request.character_ids.len()))]
    pub async fn save_story(&self, request: &SaveStory) -> EverglenResult<Story> {
        self.gateway.get_series(request.series_id).await?;
        let (characters, relationships) = self.cast(&request.character_ids).await?;

        let (story_title, plot, location) = match &request.origin {
            StoryOrigin::GeneratedFromPlot {
                title,
                plot,
                location,
            } => (title.clone(), plot.clone(), location.clone()),
            StoryOrigin::Imported => {
                let humanized = self
                    .pipeline
                    .humanize_story(&request.full_story, &characters, &relationships)
                    .await;
                let (_, title) = completed(humanized)?;

                let described = self
                    .pipeline
                    .summarize_and_locate(&request.full_story, &characters, &relationships)
                    .await;
                let (plot, location) = completed(described)?;
                (title, plot, location)
            }
        };

        let existing = self.gateway.count_stories(request.series_id).await?;
        let episode_number = i32::try_from(existing + 1).map_err(|_| {
            DatabaseError::new(DatabaseErrorKind::Query(format!(
                "Series {} has too many episodes",
                request.series_id
            )))
        })?;

        let story = self
            .gateway
            .create_story(&NewStory {
                series_id: request.series_id,
                story_title,
                episode_number,
                location,
                plot,
                full_story: request.full_story.clone(),
            })
            .await?;

        let mut linked = Vec::new();
        for id in &request.character_ids {
            if !linked.contains(id) {
                self.gateway.link_character(story.id, *id).await?;
                linked.push(*id);
            }
        }

        info!(story_id = %story.id, episode_number, "Saved story");
        Ok(story)
    }

    /// Plot holes across every story of a series, in episode order.
    #[instrument(skip(self))]
    pub async fn plot_holes_for_series(&self, series_id: SeriesId) -> EverglenResult<Vec<String>> {
        self.gateway.get_series(series_id).await?;
        let stories = self
            .gateway
            .list_stories(series_id)
            .await?
            .into_iter()
            .map(|story| story.full_story)
            .collect::<Vec<_>>();
        self.pipeline.detect_plot_holes(&stories).await
    }
}

fn completed<A, B>(outcome: SequentialOutcome<A, B>) -> EverglenResult<(A, B)> {
    if let Some(step) = outcome.failed_step() {
        error!(step, "Imported story could not be described, not saving");
    }
    outcome.into_complete()
}
