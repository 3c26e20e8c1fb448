//! Series, stories and the story/character join.

use crate::{CharacterId, LinkId, SeriesId, StoryId};
use serde::{Deserialize, Serialize};

/// A container for an ordered sequence of stories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Series {
    /// Identifier assigned at creation
    pub id: SeriesId,
    /// Series name
    pub series_name: String,
    /// Series description
    pub series_desc: String,
}

/// Fields needed to create a series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NewSeries {
    /// Series name
    pub series_name: String,
    /// Series description
    pub series_desc: String,
}

/// One episode of a series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Story {
    /// Identifier assigned at creation
    pub id: StoryId,
    /// Owning series
    pub series_id: SeriesId,
    /// Episode title
    pub story_title: String,
    /// Position in the series, starting at 1
    pub episode_number: i32,
    /// Where the story takes place
    pub location: String,
    /// Short plot summary
    pub plot: String,
    /// Full prose
    pub full_story: String,
}

/// Fields needed to create a story.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NewStory {
    /// Owning series
    pub series_id: SeriesId,
    /// Episode title
    pub story_title: String,
    /// Position in the series
    pub episode_number: i32,
    /// Where the story takes place
    pub location: String,
    /// Short plot summary
    pub plot: String,
    /// Full prose
    pub full_story: String,
}

/// Links a character to a story they appear in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoryCharacterLink {
    /// Identifier assigned at creation
    pub id: LinkId,
    /// Story side
    pub story_id: StoryId,
    /// Character side
    pub character_id: CharacterId,
}
