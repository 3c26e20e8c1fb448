//! Prompt assembly.
//!
//! Pure functions from domain data to chat messages. Nothing here talks to
//! the completion service or the gateway.

use everglen_core::{CharacterProfile, Message, PromptContext, RelationshipBrief};
use serde_json::{Value, json};

const STYLE_EXAMPLES: &str = "Here are some examples of the type of story I'm looking for: \
'Nick and Charlie' by Alice Oseman, 'The Perks of Being a Wallflower' by Stephen Chbosky, \
and 'Paper Towns' by John Green.";

const STORY_SCHEMA: &str = "{\n  \"title\": {\"type\": \"string\"},\n  \"characters\": {\"type\": \"array\", \"items\": {\"type\": \"string\"}},\n  \"plot\": {\"type\": \"string\"}\n}";

const CHARACTER_SCHEMA: &str = "{\n  \"characters\": {\"type\": \"array\", \"items\": {\"type\": \"object\", \"properties\": {\"name\": {\"type\": \"string\"}, \"high_school_clique\": {\"type\": \"string\"}, \"personality\": {\"type\": \"string\"}, \"age\": {\"type\": \"integer\"}, \"gender\": {\"type\": \"string\"}, \"current_job\": {\"type\": \"string\"}, \"additional_desc\": {\"type\": \"string\"}}, \"required\": [\"name\"]}}\n}";

const PLOT_HOLE_SCHEMA: &str =
    "{\n  \"plot_holes\": {\"type\": \"array\", \"items\": {\"type\": \"string\"}}\n}";

/// Render one character as `name (gender: G, age: A, ...)`.
///
/// Absent attributes render as empty text; languages are joined with `/`.
pub fn character_entry(profile: &CharacterProfile) -> String {
    format!(
        "{} (gender: {}, age: {}, personality: {}, clique: {}, culture: {}, languages: {}, job: {}, outfit: {}, notes: {})",
        profile.name,
        profile.gender,
        profile.age,
        profile.personality,
        profile.high_school_clique.as_deref().unwrap_or_default(),
        profile.cultural_background.as_deref().unwrap_or_default(),
        profile.native_languages.join("/"),
        profile.current_job.as_deref().unwrap_or_default(),
        profile.outfit.as_deref().unwrap_or_default(),
        profile.additional_desc.as_deref().unwrap_or_default(),
    )
}

/// Render a cast as comma-joined entries, or an empty string for no cast.
///
/// # Examples
///
/// ```
/// use everglen_core::CharacterProfile;
/// use everglen_narrative::prompt::character_entries;
///
/// let ada = CharacterProfile::builder()
///     .name("Ada").age(16).gender("female").personality("curious")
///     .build().unwrap();
///
/// assert_eq!(character_entries(&[]), "");
/// assert!(character_entries(&[ada]).starts_with("Ada (gender: female, age: 16"));
/// ```
pub fn character_entries(characters: &[CharacterProfile]) -> String {
    characters
        .iter()
        .map(character_entry)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the optional scalar parameters as `key='value'` fragments.
///
/// Only parameters that are present contribute a fragment.
pub fn optional_parameters(ctx: &PromptContext) -> String {
    let mut fragments = Vec::new();

    if let Some(series_title) = &ctx.series_title {
        fragments.push(format!("series_title='{}'", series_title));
    }
    if let Some(story_title) = &ctx.story_title {
        fragments.push(format!("story_title='{}'", story_title));
    }
    if let Some(location) = &ctx.location {
        fragments.push(format!("location='{}'", location));
    }
    if let Some(previous_story) = &ctx.previous_story {
        fragments.push(format!("previous_story='{}'", previous_story));
    }
    if !ctx.relationships.is_empty() {
        let briefs = ctx
            .relationships
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        fragments.push(format!("relationships='{}'", briefs));
    }

    fragments.join(", ")
}

/// Messages asking for a `{title, characters, plot}` outline.
pub fn story_generation(ctx: &PromptContext) -> Vec<Message> {
    let mut system = format!(
        "You are a story generator. Generate a story about high school cliques in {language}. \
         The story should have a title, characters, and a brief plot. \
         Ensure that the story is in JSON format with the following schema:\n{schema}\n",
        language = ctx.language,
        schema = STORY_SCHEMA,
    );
    if ctx.previous_story.is_some() {
        system.push_str(&format!(
            "The new story is a continuation of the previous story using the {} approach. ",
            ctx.continuity
        ));
    }
    system.push_str(&format!("Ensure that the output is in {}.", ctx.language));

    let mut user = format!(
        "Generate a story involving the following scenario: {}.",
        ctx.scenario
    );
    let cast = character_entries(&ctx.characters);
    if !cast.is_empty() {
        user.push_str(&format!(" Use the following custom characters: [{}].", cast));
    }
    let params = optional_parameters(ctx);
    if !params.is_empty() {
        user.push_str(&format!(
            " Include the following optional parameters: {{{}}}.",
            params
        ));
    }

    vec![Message::system(system), Message::user(user)]
}

/// Messages asking for one detailed scene from a plot summary.
pub fn plot_expansion(day: &str, plot: &str, language: &str) -> Vec<Message> {
    let system = format!(
        "You are a story generator. Expand this following plot summary written in {language} \
         into a detailed scene in {language}, in a witty, engaging, and emotionally resonant tone \
         that is suitable for a high school setting. {STYLE_EXAMPLES}"
    );
    let user = format!("Day: {}\nPlot Summary: {}\n\nDetailed Scene:", day, plot);
    vec![Message::system(system), Message::user(user)]
}

/// Messages asking for `{characters: [...]}` descriptors found in a story.
pub fn character_extraction(story: &str) -> Vec<Message> {
    let system = format!(
        "You are a story analyzer. Get the names of the characters, their high school cliques, \
         a brief and concise summary of their personalities, their ages, their genders, and their \
         current jobs based on their actions and dialogs in the story. \
         Ensure that the output is in JSON format with the following schema:\n{CHARACTER_SCHEMA}\n\
         Ensure that the ages of the characters are appropriate based on their roles and backgrounds. \
         The 'gender' field should indicate the character's gender, taking into account their names \
         and the context of the story. The 'current_job' field should indicate the character's \
         current job, taking into account their relationships and backgrounds. The 'additional_desc' \
         field should provide additional information about the character, such as their species or \
         profession."
    );
    vec![Message::system(system), Message::user(format!("Story: {}", story))]
}

/// Cast and relationships as a JSON document for the rewrite and summary prompts.
pub fn context_json(characters: &[CharacterProfile], relationships: &[RelationshipBrief]) -> String {
    let characters = characters
        .iter()
        .map(|c| {
            json!({
                "name": c.name,
                "age": c.age,
                "gender": c.gender,
                "personality": c.personality,
                "high_school_clique": c.high_school_clique,
                "cultural_background": c.cultural_background,
                "native_languages": c.native_languages,
                "current_job": c.current_job,
                "outfit": c.outfit,
                "additional_desc": c.additional_desc,
            })
        })
        .collect::<Vec<Value>>();
    let relationships = relationships
        .iter()
        .map(|r| json!({"characters": [r.subject, r.object], "relation": r.relation}))
        .collect::<Vec<Value>>();

    json!({"characters": characters, "relationships": relationships}).to_string()
}

fn with_context(
    mut user: String,
    characters: &[CharacterProfile],
    relationships: &[RelationshipBrief],
) -> String {
    if !characters.is_empty() || !relationships.is_empty() {
        user.push_str(&format!(
            " Use the following characters and relationships when they are mentioned by name within the story: {}",
            context_json(characters, relationships)
        ));
    }
    user
}

/// Messages asking for a rewrite of a story.
pub fn humanize(
    story: &str,
    characters: &[CharacterProfile],
    relationships: &[RelationshipBrief],
) -> Vec<Message> {
    let system = format!(
        "You are a story improver. Rewrite this story in a witty, engaging, and emotionally \
         resonant tone that is suitable for a high school setting. {STYLE_EXAMPLES} \
         The character and relationship details are background only: do not copy them verbatim \
         into the rewritten story and do not append them after it."
    );
    let user = with_context(
        format!("Rewrite the following story: {}.", story),
        characters,
        relationships,
    );
    vec![Message::system(system), Message::user(user)]
}

/// Messages asking for a title for an already rewritten story.
pub fn title(story: &str) -> Vec<Message> {
    vec![
        Message::system(
            "You are a title generator. Generate a catchy and relevant title for the following story.",
        ),
        Message::user(format!("Generate a title for the story: {}.", story)),
    ]
}

/// Messages asking for a one-paragraph plot summary.
pub fn summary(
    story: &str,
    characters: &[CharacterProfile],
    relationships: &[RelationshipBrief],
) -> Vec<Message> {
    let user = with_context(
        format!("Summarize the following story: {}.", story),
        characters,
        relationships,
    );
    vec![
        Message::system(
            "You are a story descriptor. Summarize the plot of the entire story in one paragraph.",
        ),
        Message::user(user),
    ]
}

/// Messages asking where a story takes place.
pub fn location(story: &str) -> Vec<Message> {
    vec![
        Message::system(
            "You are a story analyzer. Extract the location of the story and answer in the format \
             \"City, ST\". If the location is given in the story as Everglen, or is otherwise \
             ambiguous or fictional, assume it is Everglen, NY.",
        ),
        Message::user(format!("Get the location of the following story: {}.", story)),
    ]
}

/// Messages asking for plot holes across stories given in chronological order.
pub fn plot_holes(stories: &[String]) -> Vec<Message> {
    let system = format!(
        "You are a continuity editor for a serialized story. The stories you receive are in \
         chronological order: each one happens after every story listed before it. Find plot \
         holes, meaning events, facts or character details in a story that contradict an earlier \
         story. Ensure that the output is in JSON format with the following schema:\n{PLOT_HOLE_SCHEMA}\n\
         Return an empty array if there are none."
    );
    let user = stories
        .iter()
        .enumerate()
        .map(|(i, story)| format!("Story {}:\n{}", i + 1, story))
        .collect::<Vec<_>>()
        .join("\n\n");
    vec![Message::system(system), Message::user(user)]
}
