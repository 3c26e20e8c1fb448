//! Narrative operations built from prompts, completions and interpretation.

use crate::outcome::SequentialOutcome;
use crate::{interpret, prompt};
use everglen_core::{
    CharacterProfile, CompletionRequest, EverglenConfig, ExtractedCharacter, Message,
    PromptContext, RelationshipBrief, ResponseFormat, SamplingConfig, StoryOutline,
};
use everglen_error::{
    CompletionError, CompletionErrorKind, EverglenResult, NarrativeError, NarrativeErrorKind,
};
use everglen_interface::CompletionDriver;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Title, outline and prose produced by [`NarrativePipeline::generate_and_expand`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedStory {
    /// Title from the outline
    pub title: String,
    /// Outline returned by the first call
    pub outline: StoryOutline,
    /// Prose expanded from the outline's plot
    pub story: String,
}

/// Stateless narrative operations over an injected completion driver.
///
/// Nothing here touches persistence.
#[derive(Clone)]
pub struct NarrativePipeline {
    driver: Arc<dyn CompletionDriver>,
    sampling: SamplingConfig,
    max_tokens: u32,
    top_p: f32,
}

impl std::fmt::Debug for NarrativePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrativePipeline")
            .field("provider", &self.driver.provider_name())
            .field("model", &self.driver.model_name())
            .field("sampling", &self.sampling)
            .field("max_tokens", &self.max_tokens)
            .field("top_p", &self.top_p)
            .finish()
    }
}

impl NarrativePipeline {
    /// Pipeline with default sampling.
    pub fn new(driver: Arc<dyn CompletionDriver>) -> Self {
        Self {
            driver,
            sampling: SamplingConfig::default(),
            max_tokens: 1024,
            top_p: 1.0,
        }
    }

    /// Pipeline using the `[sampling]` and `[completion]` tables.
    pub fn from_config(driver: Arc<dyn CompletionDriver>, config: &EverglenConfig) -> Self {
        Self {
            driver,
            sampling: config.sampling.clone(),
            max_tokens: config.completion.max_tokens,
            top_p: config.completion.top_p,
        }
    }

    fn request(
        &self,
        messages: Vec<Message>,
        temperature: f32,
        format: ResponseFormat,
    ) -> EverglenResult<CompletionRequest> {
        CompletionRequest::builder()
            .messages(messages)
            .temperature(temperature)
            .max_tokens(self.max_tokens)
            .top_p(self.top_p)
            .response_format(format)
            .build()
            .map_err(|e| {
                CompletionError::new(CompletionErrorKind::Builder(format!(
                    "Failed to build request: {}",
                    e
                )))
                .into()
            })
    }

    async fn complete(
        &self,
        messages: Vec<Message>,
        temperature: f32,
        format: ResponseFormat,
    ) -> EverglenResult<String> {
        let request = self.request(messages, temperature, format)?;
        debug!(
            provider = self.driver.provider_name(),
            model = self.driver.model_name(),
            temperature,
            json_mode = request.expects_json(),
            "Requesting completion"
        );
        let response = self.driver.generate(&request).await?;
        Ok(response.into_text())
    }

    /// Generate a `{title, characters, plot}` outline for a scenario.
    #[instrument(skip(self, ctx), fields(
        characters = ctx.characters.len(),
        relationships = ctx.relationships.len(),
        continuation = ctx.previous_story.is_some(),
        language = %ctx.language,
    ))]
    pub async fn generate_story(&self, ctx: &PromptContext) -> EverglenResult<StoryOutline> {
        let text = self
            .complete(
                prompt::story_generation(ctx),
                self.sampling.generate_story,
                ResponseFormat::JsonObject,
            )
            .await?;
        let outline = interpret::story_outline(&text)?;
        info!(title = %outline.title, "Generated story outline");
        Ok(outline)
    }

    /// Expand a plot summary into one detailed scene of prose.
    #[instrument(skip(self, plot), fields(plot_len = plot.len()))]
    pub async fn expand_plot_to_story(&self, plot: &str, language: &str) -> EverglenResult<String> {
        if plot.trim().is_empty() {
            return Err(NarrativeError::new(NarrativeErrorKind::EmptyInput("plot".into())).into());
        }
        let text = self
            .complete(
                prompt::plot_expansion("1", plot, language),
                self.sampling.expand_plot,
                ResponseFormat::Text,
            )
            .await?;
        Ok(interpret::free_text(text))
    }

    /// Recover character descriptors from prose.
    #[instrument(skip(self, story), fields(story_len = story.len()))]
    pub async fn extract_characters(&self, story: &str) -> EverglenResult<Vec<ExtractedCharacter>> {
        if story.trim().is_empty() {
            return Err(NarrativeError::new(NarrativeErrorKind::EmptyInput("story".into())).into());
        }
        let text = self
            .complete(
                prompt::character_extraction(story),
                self.sampling.extract_characters,
                ResponseFormat::JsonObject,
            )
            .await?;
        let characters = interpret::extracted_characters(&text)?;
        info!(count = characters.len(), "Extracted characters");
        Ok(characters)
    }

    /// Rewrite a story, then title the rewrite.
    #[instrument(skip_all, fields(story_len = story.len(), characters = characters.len()))]
    pub async fn humanize_story(
        &self,
        story: &str,
        characters: &[CharacterProfile],
        relationships: &[RelationshipBrief],
    ) -> SequentialOutcome<String, String> {
        let rewritten = match self
            .complete(
                prompt::humanize(story, characters, relationships),
                self.sampling.humanize,
                ResponseFormat::Text,
            )
            .await
        {
            Ok(text) => interpret::free_text(text),
            Err(error) => {
                warn!(step = "rewrite", error = %error, "Humanize failed");
                return SequentialOutcome::FirstFailed {
                    step: "rewrite",
                    error,
                };
            }
        };

        match self
            .complete(prompt::title(&rewritten), self.sampling.title, ResponseFormat::Text)
            .await
        {
            Ok(title) => SequentialOutcome::Complete {
                first: rewritten,
                second: interpret::free_text(title),
            },
            Err(error) => {
                warn!(step = "title", error = %error, "Humanize failed");
                SequentialOutcome::SecondFailed {
                    first: rewritten,
                    step: "title",
                    error,
                }
            }
        }
    }

    /// Summarize a story, then infer where it takes place.
    #[instrument(skip_all, fields(story_len = story.len(), characters = characters.len()))]
    pub async fn summarize_and_locate(
        &self,
        story: &str,
        characters: &[CharacterProfile],
        relationships: &[RelationshipBrief],
    ) -> SequentialOutcome<String, String> {
        let summary = match self
            .complete(
                prompt::summary(story, characters, relationships),
                self.sampling.summarize,
                ResponseFormat::Text,
            )
            .await
        {
            Ok(text) => interpret::free_text(text),
            Err(error) => {
                warn!(step = "summary", error = %error, "Summarize failed");
                return SequentialOutcome::FirstFailed {
                    step: "summary",
                    error,
                };
            }
        };

        match self
            .complete(prompt::location(story), self.sampling.locate, ResponseFormat::Text)
            .await
        {
            Ok(location) => SequentialOutcome::Complete {
                first: summary,
                second: interpret::free_text(location),
            },
            Err(error) => {
                warn!(step = "location", error = %error, "Locate failed");
                SequentialOutcome::SecondFailed {
                    first: summary,
                    step: "location",
                    error,
                }
            }
        }
    }

    /// Flag inconsistencies across stories given in chronological order.
    ///
    /// All stories go into a single request.
    #[instrument(skip_all, fields(stories = stories.len()))]
    pub async fn detect_plot_holes(&self, stories: &[String]) -> EverglenResult<Vec<String>> {
        if stories.is_empty() {
            return Err(NarrativeError::new(NarrativeErrorKind::NoStories).into());
        }
        let text = self
            .complete(
                prompt::plot_holes(stories),
                self.sampling.plot_holes,
                ResponseFormat::JsonObject,
            )
            .await?;
        let holes = interpret::plot_holes(&text)?;
        info!(count = holes.len(), "Plot hole detection finished");
        Ok(holes)
    }

    /// Generate an outline, then expand its plot into prose.
    #[instrument(skip_all)]
    pub async fn generate_and_expand(&self, ctx: &PromptContext) -> EverglenResult<GeneratedStory> {
        let outline = self.generate_story(ctx).await?;
        let story = self.expand_plot_to_story(&outline.plot, &ctx.language).await?;
        Ok(GeneratedStory {
            title: outline.title.clone(),
            outline,
            story,
        })
    }
}
