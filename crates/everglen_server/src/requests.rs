//! Typed request bodies validated from decoded forms.

use crate::form::FormTree;
use everglen_core::{
    CharacterId, CharacterProfile, NewRelationship, NewSeries, RelationshipId, SeriesId, StoryId,
};
use everglen_error::{FormError, FormErrorKind};
use everglen_narrative::{GenerateStory, SaveStory, StoryOrigin};
use std::str::FromStr;

/// Ids listed under a group such as `characters[0][id]`, in index order.
///
/// An absent group is an empty cast. Entries may also be bare values
/// (`characters[0]=3`).
fn character_ids(form: &FormTree, group: &str) -> Result<Vec<CharacterId>, FormError> {
    let Some(node) = form.lookup(group) else {
        return Ok(Vec::new());
    };
    if node.value().is_some() {
        return Err(FormError::new(FormErrorKind::WrongShape(group.to_string())));
    }

    node.entries()
        .into_iter()
        .map(|(index, entry)| {
            let id = match entry {
                FormTree::Value(_) => form.required_i32(&format!("{}[{}]", group, index))?,
                FormTree::Group(_) => form.required_i32(&format!("{}[{}][id]", group, index))?,
            };
            Ok(CharacterId(id))
        })
        .collect()
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

/// `story`: prose to extract characters from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCharactersForm {
    /// Story text
    pub story: String,
}

impl TryFrom<&FormTree> for ScanCharactersForm {
    type Error = FormError;

    fn try_from(form: &FormTree) -> Result<Self, Self::Error> {
        Ok(Self {
            story: form.required_str("story")?.to_string(),
        })
    }
}

/// Character attributes as submitted by the character editor.
///
/// `native_languages` accepts either indexed values
/// (`native_languages[0]=English`) or one comma-separated value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterForm {
    /// Id of the character being edited; absent when adding
    pub id: Option<CharacterId>,
    /// Profile to store
    pub profile: CharacterProfile,
}

fn native_languages(form: &FormTree) -> Vec<String> {
    match form.lookup("native_languages") {
        Some(FormTree::Value(list)) => list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(group) => group
            .entries()
            .into_iter()
            .filter_map(|(_, node)| node.value())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

impl TryFrom<&FormTree> for CharacterForm {
    type Error = FormError;

    fn try_from(form: &FormTree) -> Result<Self, Self::Error> {
        let profile = CharacterProfile {
            name: form.required_str("name")?.to_string(),
            age: form.required_i32("age")?,
            gender: form.required_str("gender")?.to_string(),
            personality: form.required_str("personality")?.to_string(),
            high_school_clique: owned(form.optional_str("high_school_clique")?),
            cultural_background: owned(form.optional_str("cultural_background")?),
            native_languages: native_languages(form),
            current_job: owned(form.optional_str("current_job")?),
            outfit: owned(form.optional_str("outfit")?),
            additional_desc: owned(form.optional_str("additional_desc")?),
        };
        Ok(Self {
            id: form.optional_i32("character_id")?.map(CharacterId),
            profile,
        })
    }
}

/// `relation_subject`, `relation_object`, `relation`, and `relation_id` when editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipForm {
    /// Relationship being edited
    pub id: Option<RelationshipId>,
    /// New values
    pub relationship: NewRelationship,
}

impl TryFrom<&FormTree> for RelationshipForm {
    type Error = FormError;

    fn try_from(form: &FormTree) -> Result<Self, Self::Error> {
        Ok(Self {
            id: form.optional_i32("relation_id")?.map(RelationshipId),
            relationship: NewRelationship {
                subject: CharacterId(form.required_i32("relation_subject")?),
                object: CharacterId(form.required_i32("relation_object")?),
                relation: form.required_str("relation")?.to_string(),
            },
        })
    }
}

impl TryFrom<&FormTree> for NewSeries {
    type Error = FormError;

    fn try_from(form: &FormTree) -> Result<Self, Self::Error> {
        Ok(NewSeries {
            series_name: form.required_str("series_name")?.to_string(),
            series_desc: form.required_str("series_desc")?.to_string(),
        })
    }
}

/// Story generation request.
///
/// `summary` is the premise, `series[id]` the owning series and
/// `characters[n][id]` the cast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateStoryForm(pub GenerateStory);

impl TryFrom<&FormTree> for GenerateStoryForm {
    type Error = FormError;

    fn try_from(form: &FormTree) -> Result<Self, Self::Error> {
        Ok(Self(GenerateStory {
            series_id: SeriesId(form.required_i32("series[id]")?),
            scenario: form.required_str("summary")?.to_string(),
            character_ids: character_ids(form, "characters")?,
            story_title: owned(form.optional_str("story_title")?),
            location: owned(form.optional_str("location")?),
            previous_story_id: form.optional_i32("previous_story[id]")?.map(StoryId),
            continuity: owned(form.optional_str("continuity")?),
            language: owned(form.optional_str("language")?),
        }))
    }
}

/// `original_story` plus `story_characters[n][id]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanizeForm {
    /// Draft to rewrite
    pub original_story: String,
    /// Cast used as background
    pub character_ids: Vec<CharacterId>,
}

impl TryFrom<&FormTree> for HumanizeForm {
    type Error = FormError;

    fn try_from(form: &FormTree) -> Result<Self, Self::Error> {
        Ok(Self {
            original_story: form.required_str("original_story")?.to_string(),
            character_ids: character_ids(form, "story_characters")?,
        })
    }
}

/// Value of the `story_origin` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum StoryOriginKind {
    /// Saved straight from the generate flow
    GeneratedFromPlot,
    /// Written elsewhere
    Imported,
}

/// Story save request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveStoryForm(pub SaveStory);

impl TryFrom<&FormTree> for SaveStoryForm {
    type Error = FormError;

    fn try_from(form: &FormTree) -> Result<Self, Self::Error> {
        let raw_origin = form.required_str("story_origin")?;
        let origin = match StoryOriginKind::from_str(raw_origin).map_err(|_| {
            FormError::new(FormErrorKind::InvalidValue {
                field: "story_origin".to_string(),
                value: raw_origin.to_string(),
            })
        })? {
            StoryOriginKind::GeneratedFromPlot => StoryOrigin::GeneratedFromPlot {
                title: form.required_str("story_title")?.to_string(),
                plot: form.required_str("plot")?.to_string(),
                location: form.required_str("location")?.to_string(),
            },
            StoryOriginKind::Imported => StoryOrigin::Imported,
        };

        Ok(Self(SaveStory {
            series_id: SeriesId(form.required_i32("series[id]")?),
            character_ids: character_ids(form, "characters")?,
            full_story: form.required_str("full_story")?.to_string(),
            origin,
        }))
    }
}

/// `series[id]` for a continuity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotHolesForm {
    /// Series to check
    pub series_id: SeriesId,
}

impl TryFrom<&FormTree> for PlotHolesForm {
    type Error = FormError;

    fn try_from(form: &FormTree) -> Result<Self, Self::Error> {
        Ok(Self {
            series_id: SeriesId(form.required_i32("series[id]")?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(body: &str) -> FormTree {
        FormTree::parse(body.as_bytes()).unwrap()
    }

    #[test]
    fn test_generate_form() {
        let parsed = GenerateStoryForm::try_from(&form(
            "summary=Prom&series[id]=2&characters[1][id]=8&characters[0][id]=5&location=Gym",
        ))
        .unwrap()
        .0;

        assert_eq!(parsed.series_id, SeriesId(2));
        assert_eq!(parsed.character_ids, vec![CharacterId(5), CharacterId(8)]);
        assert_eq!(parsed.location.as_deref(), Some("Gym"));
        assert_eq!(parsed.story_title, None);
        assert_eq!(parsed.previous_story_id, None);
    }

    #[test]
    fn test_generate_form_missing_series() {
        let err = GenerateStoryForm::try_from(&form("summary=Prom")).unwrap_err();
        assert_eq!(err.kind, FormErrorKind::MissingField("series[id]".into()));
    }

    #[test]
    fn test_character_id_must_be_integer() {
        let err = HumanizeForm::try_from(&form(
            "original_story=Once&story_characters[0][id]=abc",
        ))
        .unwrap_err();
        assert_eq!(
            err.kind,
            FormErrorKind::InvalidInteger {
                field: "story_characters[0][id]".into(),
                value: "abc".into(),
            }
        );
    }

    #[test]
    fn test_character_form_languages() {
        let indexed = CharacterForm::try_from(&form(
            "name=Ada&age=16&gender=female&personality=bold\
             &native_languages[1]=Polish&native_languages[0]=English",
        ))
        .unwrap();
        assert_eq!(indexed.profile.native_languages, vec!["English", "Polish"]);
        assert_eq!(indexed.id, None);
        assert_eq!(indexed.profile.outfit, None);

        let listed = CharacterForm::try_from(&form(
            "character_id=4&name=Ada&age=16&gender=female&personality=bold\
             &native_languages=English%2C+Dutch",
        ))
        .unwrap();
        assert_eq!(listed.profile.native_languages, vec!["English", "Dutch"]);
        assert_eq!(listed.id, Some(CharacterId(4)));
    }

    #[test]
    fn test_save_form_origins() {
        let generated = SaveStoryForm::try_from(&form(
            "story_origin=generated_from_plot&series[id]=1&full_story=Text\
             &story_title=T&plot=P&location=Everglen%2C+NY&characters[0][id]=3",
        ))
        .unwrap()
        .0;
        assert_eq!(
            generated.origin,
            StoryOrigin::GeneratedFromPlot {
                title: "T".into(),
                plot: "P".into(),
                location: "Everglen, NY".into(),
            }
        );
        assert_eq!(generated.character_ids, vec![CharacterId(3)]);

        let imported = SaveStoryForm::try_from(&form(
            "story_origin=imported&series[id]=1&full_story=Text",
        ))
        .unwrap()
        .0;
        assert_eq!(imported.origin, StoryOrigin::Imported);
        assert!(imported.character_ids.is_empty());

        let err = SaveStoryForm::try_from(&form(
            "story_origin=generated_from_plot&series[id]=1&full_story=Text&plot=P&location=L",
        ))
        .unwrap_err();
        assert_eq!(err.kind, FormErrorKind::MissingField("story_title".into()));
    }

    #[test]
    fn test_save_form_unknown_origin() {
        let err = SaveStoryForm::try_from(&form(
            "story_origin=dreamed&series[id]=1&full_story=Text",
        ))
        .unwrap_err();
        assert!(matches!(err.kind, FormErrorKind::InvalidValue { .. }));
    }

    #[test]
    fn test_relationship_form() {
        let parsed = RelationshipForm::try_from(&form(
            "relation_id=3&relation_subject=1&relation_object=2&relation=rivals",
        ))
        .unwrap();
        assert_eq!(parsed.id, Some(RelationshipId(3)));
        assert_eq!(parsed.relationship.object, CharacterId(2));
    }
}
