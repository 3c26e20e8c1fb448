//! Row types and conversions to the domain model.

use crate::schema::{characters, relationships, series, stories, story_characters};
use diesel::prelude::*;
use everglen_core::{
    Character, CharacterId, CharacterProfile, LinkId, NewRelationship, NewSeries, NewStory,
    Relationship, RelationshipId, Series, SeriesId, Story, StoryCharacterLink, StoryId,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = characters)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CharacterRow {
    pub id: i32,
    pub character_name: String,
    pub character_age: i32,
    pub character_gender: String,
    pub character_personality: String,
    pub high_school_clique: Option<String>,
    pub cultural_background: Option<String>,
    pub native_languages: Vec<String>,
    pub current_job: Option<String>,
    pub outfit: Option<String>,
    pub additional_desc: Option<String>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = characters)]
#[diesel(treat_none_as_null = true)]
pub struct CharacterValues<'a> {
    pub character_name: &'a str,
    pub character_age: i32,
    pub character_gender: &'a str,
    pub character_personality: &'a str,
    pub high_school_clique: Option<&'a str>,
    pub cultural_background: Option<&'a str>,
    pub native_languages: &'a [String],
    pub current_job: Option<&'a str>,
    pub outfit: Option<&'a str>,
    pub additional_desc: Option<&'a str>,
}

impl<'a> From<&'a CharacterProfile> for CharacterValues<'a> {
    fn from(p: &'a CharacterProfile) -> Self {
        Self {
            character_name: &p.name,
            character_age: p.age,
            character_gender: &p.gender,
            character_personality: &p.personality,
            high_school_clique: p.high_school_clique.as_deref(),
            cultural_background: p.cultural_background.as_deref(),
            native_languages: &p.native_languages,
            current_job: p.current_job.as_deref(),
            outfit: p.outfit.as_deref(),
            additional_desc: p.additional_desc.as_deref(),
        }
    }
}

impl From<CharacterRow> for Character {
    fn from(row: CharacterRow) -> Self {
        Character {
            id: CharacterId(row.id),
            profile: CharacterProfile {
                name: row.character_name,
                age: row.character_age,
                gender: row.character_gender,
                personality: row.character_personality,
                high_school_clique: row.high_school_clique,
                cultural_background: row.cultural_background,
                native_languages: row.native_languages,
                current_job: row.current_job,
                outfit: row.outfit,
                additional_desc: row.additional_desc,
            },
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = relationships)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RelationshipRow {
    pub id: i32,
    pub char_subject_id: i32,
    pub char_object_id: i32,
    pub relation: String,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = relationships)]
pub struct RelationshipValues<'a> {
    pub char_subject_id: i32,
    pub char_object_id: i32,
    pub relation: &'a str,
}

impl<'a> From<&'a NewRelationship> for RelationshipValues<'a> {
    fn from(r: &'a NewRelationship) -> Self {
        Self {
            char_subject_id: r.subject.get(),
            char_object_id: r.object.get(),
            relation: &r.relation,
        }
    }
}

impl From<RelationshipRow> for Relationship {
    fn from(row: RelationshipRow) -> Self {
        Relationship {
            id: RelationshipId(row.id),
            subject: CharacterId(row.char_subject_id),
            object: CharacterId(row.char_object_id),
            relation: row.relation,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = series)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SeriesRow {
    pub id: i32,
    pub series_name: String,
    pub series_desc: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = series)]
pub struct SeriesValues<'a> {
    pub series_name: &'a str,
    pub series_desc: &'a str,
}

impl<'a> From<&'a NewSeries> for SeriesValues<'a> {
    fn from(s: &'a NewSeries) -> Self {
        Self {
            series_name: &s.series_name,
            series_desc: &s.series_desc,
        }
    }
}

impl From<SeriesRow> for Series {
    fn from(row: SeriesRow) -> Self {
        Series {
            id: SeriesId(row.id),
            series_name: row.series_name,
            series_desc: row.series_desc,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = stories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StoryRow {
    pub id: i32,
    pub story_title: String,
    pub episode_number: i32,
    pub location: String,
    pub plot: String,
    pub full_story: String,
    pub series_id: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = stories)]
pub struct StoryValues<'a> {
    pub story_title: &'a str,
    pub episode_number: i32,
    pub location: &'a str,
    pub plot: &'a str,
    pub full_story: &'a str,
    pub series_id: i32,
}

impl<'a> From<&'a NewStory> for StoryValues<'a> {
    fn from(s: &'a NewStory) -> Self {
        Self {
            story_title: &s.story_title,
            episode_number: s.episode_number,
            location: &s.location,
            plot: &s.plot,
            full_story: &s.full_story,
            series_id: s.series_id.get(),
        }
    }
}

impl From<StoryRow> for Story {
    fn from(row: StoryRow) -> Self {
        Story {
            id: StoryId(row.id),
            series_id: SeriesId(row.series_id),
            story_title: row.story_title,
            episode_number: row.episode_number,
            location: row.location,
            plot: row.plot,
            full_story: row.full_story,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = story_characters)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StoryCharacterRow {
    pub id: i32,
    pub story_id: i32,
    pub char_id: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = story_characters)]
pub struct StoryCharacterValues {
    pub story_id: i32,
    pub char_id: i32,
}

impl From<StoryCharacterRow> for StoryCharacterLink {
    fn from(row: StoryCharacterRow) -> Self {
        StoryCharacterLink {
            id: LinkId(row.id),
            story_id: StoryId(row.story_id),
            character_id: CharacterId(row.char_id),
        }
    }
}
