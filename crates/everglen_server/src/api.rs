//! HTTP routes for characters, relationships, series and stories.
//!
//! Request bodies are form-encoded with bracket paths; responses are JSON.

use crate::error::ApiError;
use crate::form::FormTree;
use crate::requests::{
    CharacterForm, GenerateStoryForm, HumanizeForm, PlotHolesForm, RelationshipForm,
    SaveStoryForm, ScanCharactersForm,
};
use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use everglen_core::{Character, CharacterId, NewSeries, Relationship, RelationshipId, Story};
use everglen_error::FormError;
use everglen_interface::PersistenceGateway;
use everglen_narrative::{SequentialOutcome, StoryLibrary};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, instrument};

type ApiResult = Result<Json<Value>, ApiError>;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    library: Arc<StoryLibrary>,
    gateway: Arc<dyn PersistenceGateway>,
}

impl AppState {
    /// Build state around a library; the gateway is taken from it.
    pub fn new(library: Arc<StoryLibrary>) -> Self {
        let gateway = library.gateway().clone();
        Self { library, gateway }
    }
}

/// Creates the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/characters/list", get(list_characters))
        .route("/api/characters/scan", post(scan_characters))
        .route("/api/characters/add", post(add_character))
        .route("/api/characters/edit", post(edit_character))
        .route("/api/characters/view/:id", get(view_character))
        .route("/api/relationships/add", post(add_relationship))
        .route("/api/relationships/edit", post(edit_relationship))
        .route("/api/series/add", post(add_series))
        .route("/api/series/list", get(list_series))
        .route("/api/stories/generate", post(generate_story))
        .route("/api/stories/humanize", post(humanize_story))
        .route("/api/stories/save", post(save_story))
        .route("/api/stories/plot-holes", post(plot_holes))
        .with_state(state)
}

fn parse<T>(body: &Bytes) -> Result<T, ApiError>
where
    T: for<'a> TryFrom<&'a FormTree, Error = FormError>,
{
    let form = FormTree::parse(body)?;
    debug!(?form, "Decoded form");
    Ok(T::try_from(&form)?)
}

fn ack(id_key: &str, id: i32, message: &str) -> Json<Value> {
    Json(json!({ id_key: id, "message": message, "status": "OK" }))
}

fn character_json(character: &Character) -> Value {
    let p = &character.profile;
    json!({
        "id": character.id,
        "character_name": p.name,
        "character_age": p.age,
        "character_gender": p.gender,
        "character_personality": p.personality,
        "high_school_clique": p.high_school_clique,
        "cultural_background": p.cultural_background,
        "native_languages": p.native_languages,
        "current_job": p.current_job,
        "outfit": p.outfit,
        "additional_desc": p.additional_desc,
    })
}

fn relationship_json(relationship: &Relationship) -> Value {
    json!({
        "relation_id": relationship.id,
        "relation_subject": relationship.subject,
        "relation_object": relationship.object,
        "relation": relationship.relation,
    })
}

fn story_json(story: &Story) -> Value {
    json!({
        "id": story.id,
        "story_title": story.story_title,
        "episode_number": story.episode_number,
        "location": story.location,
        "plot": story.plot,
        "full_story": story.full_story,
    })
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

async fn list_characters(State(state): State<AppState>) -> ApiResult {
    let characters = state.gateway.list_characters().await?;
    Ok(Json(Value::Array(
        characters.iter().map(character_json).collect(),
    )))
}

#[instrument(skip_all)]
async fn scan_characters(State(state): State<AppState>, body: Bytes) -> ApiResult {
    let form: ScanCharactersForm = parse(&body)?;
    let characters = state
        .library
        .pipeline()
        .extract_characters(&form.story)
        .await?;
    Ok(Json(json!({ "characters": characters })))
}

#[instrument(skip_all)]
async fn add_character(State(state): State<AppState>, body: Bytes) -> ApiResult {
    let form: CharacterForm = parse(&body)?;
    let character = state.gateway.create_character(&form.profile).await?;
    Ok(ack("character_id", character.id.get(), "CHARACTER_ADDED"))
}

#[instrument(skip_all)]
async fn edit_character(State(state): State<AppState>, body: Bytes) -> ApiResult {
    let form = FormTree::parse(&body)?;
    let id = CharacterId(form.required_i32("character_id")?);
    let CharacterForm { profile, .. } = CharacterForm::try_from(&form)?;
    let character = state.gateway.update_character(id, &profile).await?;
    Ok(ack("character_id", character.id.get(), "CHARACTER_UPDATED"))
}

async fn view_character(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult {
    let character = state.gateway.get_character(CharacterId(id)).await?;
    let relationships = state
        .gateway
        .relationships_for_character(character.id)
        .await?;
    Ok(Json(json!({
        "character": character_json(&character),
        "relationships": relationships.iter().map(relationship_json).collect::<Vec<_>>(),
    })))
}

#[instrument(skip_all)]
async fn add_relationship(State(state): State<AppState>, body: Bytes) -> ApiResult {
    let form: RelationshipForm = parse(&body)?;
    let relationship = state
        .gateway
        .create_relationship(&form.relationship)
        .await?;
    Ok(ack("relation_id", relationship.id.get(), "CONNECTION_ADDED"))
}

#[instrument(skip_all)]
async fn edit_relationship(State(state): State<AppState>, body: Bytes) -> ApiResult {
    let form = FormTree::parse(&body)?;
    let id = RelationshipId(form.required_i32("relation_id")?);
    let RelationshipForm { relationship, .. } = RelationshipForm::try_from(&form)?;
    let updated = state.gateway.update_relationship(id, &relationship).await?;
    Ok(ack("relation_id", updated.id.get(), "CONNECTION_UPDATED"))
}

#[instrument(skip_all)]
async fn add_series(State(state): State<AppState>, body: Bytes) -> ApiResult {
    let new_series: NewSeries = parse(&body)?;
    let series = state.gateway.create_series(&new_series).await?;
    Ok(ack("series_id", series.id.get(), "SERIES_ADDED"))
}

async fn list_series(State(state): State<AppState>) -> ApiResult {
    let mut listing = Vec::new();
    for series in state.gateway.list_series().await? {
        let stories = state.gateway.list_stories(series.id).await?;
        listing.push(json!({
            "id": series.id,
            "series_name": series.series_name,
            "series_desc": series.series_desc,
            "stories": stories.iter().map(story_json).collect::<Vec<_>>(),
        }));
    }
    Ok(Json(Value::Array(listing)))
}

#[instrument(skip_all)]
async fn generate_story(State(state): State<AppState>, body: Bytes) -> ApiResult {
    let GenerateStoryForm(request) = parse(&body)?;
    let generated = state.library.generate(&request).await?;
    Ok(Json(json!({
        "story_title": generated.title,
        "plot": generated.outline.plot,
        "characters": generated.outline.characters,
        "story": generated.story,
    })))
}

#[instrument(skip_all)]
async fn humanize_story(State(state): State<AppState>, body: Bytes) -> ApiResult {
    let form: HumanizeForm = parse(&body)?;
    let outcome = state
        .library
        .humanize(&form.original_story, &form.character_ids)
        .await?;
    match outcome {
        SequentialOutcome::Complete { first, second } => Ok(Json(json!({
            "output": { "improved_story": first, "title": second }
        }))),
        SequentialOutcome::FirstFailed { step, error }
        | SequentialOutcome::SecondFailed { step, error, .. } => {
            Err(ApiError::at_stage(error, step))
        }
    }
}

#[instrument(skip_all)]
async fn save_story(State(state): State<AppState>, body: Bytes) -> ApiResult {
    let SaveStoryForm(request) = parse(&body)?;
    let story = state.library.save_story(&request).await?;
    let mut payload = ack("story_id", story.id.get(), "STORY_ADDED");
    payload.0["episode_number"] = json!(story.episode_number);
    Ok(payload)
}

#[instrument(skip_all)]
async fn plot_holes(State(state): State<AppState>, body: Bytes) -> ApiResult {
    let form: PlotHolesForm = parse(&body)?;
    let holes = state.library.plot_holes_for_series(form.series_id).await?;
    Ok(Json(json!({ "series_id": form.series_id, "plot_holes": holes })))
}
