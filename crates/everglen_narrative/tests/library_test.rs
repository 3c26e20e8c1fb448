//! Story library workflows over the in-memory gateway.

mod test_utils;

use everglen_core::{
    CharacterId, CharacterProfile, DefaultsConfig, NewRelationship, NewSeries, SeriesId, StoryId,
};
use everglen_database::InMemoryGateway;
use everglen_error::{DatabaseErrorKind, EverglenErrorKind, FailureCategory, NarrativeErrorKind};
use everglen_interface::PersistenceGateway;
use everglen_narrative::{GenerateStory, NarrativePipeline, SaveStory, StoryLibrary, StoryOrigin};
use std::sync::Arc;
use test_utils::{MockDriver, MockResponse};

fn profile(name: &str, clique: &str) -> CharacterProfile {
    CharacterProfile::builder()
        .name(name)
        .age(16)
        .gender("female")
        .personality("bold")
        .high_school_clique(clique)
        .build()
        .unwrap()
}

fn library(gateway: &InMemoryGateway, driver: &MockDriver) -> StoryLibrary {
    StoryLibrary::new(
        Arc::new(gateway.clone()),
        NarrativePipeline::new(Arc::new(driver.clone())),
        DefaultsConfig::default(),
    )
}

async fn series(gateway: &InMemoryGateway, name: &str) -> SeriesId {
    gateway
        .create_series(&NewSeries {
            series_name: name.to_string(),
            series_desc: "Tests".to_string(),
        })
        .await
        .unwrap()
        .id
}

fn from_plot(series_id: SeriesId, title: &str, cast: Vec<CharacterId>) -> SaveStory {
    SaveStory {
        series_id,
        character_ids: cast,
        full_story: format!("{} in full", title),
        origin: StoryOrigin::GeneratedFromPlot {
            title: title.to_string(),
            plot: format!("{} plot", title),
            location: "Everglen, NY".to_string(),
        },
    }
}

#[tokio::test]
async fn test_episode_numbers_are_per_series() {
    let gateway = InMemoryGateway::new();
    let driver = MockDriver::new_texts(Vec::<String>::new());
    let library = library(&gateway, &driver);
    let main = series(&gateway, "Main").await;
    let spinoff = series(&gateway, "Spinoff").await;

    let first = library.save_story(&from_plot(main, "One", vec![])).await.unwrap();
    let other = library.save_story(&from_plot(spinoff, "Side", vec![])).await.unwrap();
    let second = library.save_story(&from_plot(main, "Two", vec![])).await.unwrap();
    let third = library.save_story(&from_plot(main, "Three", vec![])).await.unwrap();

    assert_eq!(first.episode_number, 1);
    assert_eq!(second.episode_number, 2);
    assert_eq!(third.episode_number, 3);
    assert_eq!(other.episode_number, 1);
    assert_eq!(driver.call_count(), 0);
}

#[tokio::test]
async fn test_save_links_each_character_once() {
    let gateway = InMemoryGateway::new();
    let driver = MockDriver::new_texts(Vec::<String>::new());
    let library = library(&gateway, &driver);
    let main = series(&gateway, "Main").await;
    let ada = gateway.create_character(&profile("Ada", "band")).await.unwrap();
    let bea = gateway.create_character(&profile("Bea", "drama")).await.unwrap();

    let story = library
        .save_story(&from_plot(main, "One", vec![ada.id, bea.id, ada.id]))
        .await
        .unwrap();

    let cast = gateway.story_characters(story.id).await.unwrap();
    assert_eq!(cast.len(), 2);
    assert_eq!(cast[0].id, ada.id);
    assert_eq!(cast[1].id, bea.id);
}

#[tokio::test]
async fn test_imported_story_uses_model_metadata() {
    let gateway = InMemoryGateway::new();
    let driver = MockDriver::new_texts([
        "A warmer rewrite.",
        "The Locker Incident",
        "Ada finds a note in her locker.",
        "Everglen, NY",
    ]);
    let library = library(&gateway, &driver);
    let main = series(&gateway, "Main").await;
    let ada = gateway.create_character(&profile("Ada", "band")).await.unwrap();

    let story = library
        .save_story(&SaveStory {
            series_id: main,
            character_ids: vec![ada.id],
            full_story: "Original prose.".to_string(),
            origin: StoryOrigin::Imported,
        })
        .await
        .unwrap();

    assert_eq!(story.story_title, "The Locker Incident");
    assert_eq!(story.plot, "Ada finds a note in her locker.");
    assert_eq!(story.location, "Everglen, NY");
    assert_eq!(story.full_story, "Original prose.");
    assert_eq!(driver.call_count(), 4);
}

#[tokio::test]
async fn test_imported_story_not_saved_when_summary_fails() {
    let gateway = InMemoryGateway::new();
    let driver = MockDriver::new_sequence(vec![
        MockResponse::text("A warmer rewrite."),
        MockResponse::text("The Locker Incident"),
        MockResponse::status(503),
    ]);
    let library = library(&gateway, &driver);
    let main = series(&gateway, "Main").await;

    let err = library
        .save_story(&SaveStory {
            series_id: main,
            character_ids: vec![],
            full_story: "Original prose.".to_string(),
            origin: StoryOrigin::Imported,
        })
        .await
        .unwrap_err();

    assert_eq!(err.category(), FailureCategory::ServiceUnavailable);
    assert_eq!(gateway.count_stories(main).await.unwrap(), 0);
    assert_eq!(driver.call_count(), 3);
}

#[tokio::test]
async fn test_save_rejects_unknown_character_before_calling_model() {
    let gateway = InMemoryGateway::new();
    let driver = MockDriver::new_texts(Vec::<String>::new());
    let library = library(&gateway, &driver);
    let main = series(&gateway, "Main").await;

    let err = library
        .save_story(&SaveStory {
            series_id: main,
            character_ids: vec![CharacterId(12)],
            full_story: "Prose".to_string(),
            origin: StoryOrigin::Imported,
        })
        .await
        .unwrap_err();

    match err.kind() {
        EverglenErrorKind::Database(db) => assert!(matches!(
            db.kind,
            DatabaseErrorKind::NotFound { entity: "character", id: 12 }
        )),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(driver.call_count(), 0);
    assert_eq!(gateway.count_stories(main).await.unwrap(), 0);
}

#[tokio::test]
async fn test_cast_deduplicates_shared_relationships() {
    let gateway = InMemoryGateway::new();
    let driver = MockDriver::new_texts(Vec::<String>::new());
    let library = library(&gateway, &driver);
    let ada = gateway.create_character(&profile("Ada", "band")).await.unwrap();
    let bea = gateway.create_character(&profile("Bea", "drama")).await.unwrap();
    let cat = gateway.create_character(&profile("Cat", "jocks")).await.unwrap();
    gateway
        .create_relationship(&NewRelationship {
            subject: ada.id,
            object: bea.id,
            relation: "best friends".to_string(),
        })
        .await
        .unwrap();
    gateway
        .create_relationship(&NewRelationship {
            subject: bea.id,
            object: cat.id,
            relation: "rivals".to_string(),
        })
        .await
        .unwrap();

    let (profiles, briefs) = library.cast(&[ada.id, bea.id]).await.unwrap();

    assert_eq!(profiles.len(), 2);
    let rendered: Vec<String> = briefs.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec!["Ada and Bea are best friends", "Bea and Cat are rivals"]
    );
}

#[tokio::test]
async fn test_generate_includes_series_and_previous_story() {
    let gateway = InMemoryGateway::new();
    let driver = MockDriver::new_texts([
        r#"{"title":"Homecoming","characters":["Ada"],"plot":"Ada runs for queen"}"#,
        "The gym smelled of popcorn.",
    ]);
    let library = library(&gateway, &driver);
    let main = series(&gateway, "Everglen Nights").await;
    let ada = gateway.create_character(&profile("Ada", "band")).await.unwrap();
    let pilot = library
        .save_story(&from_plot(main, "Pilot", vec![ada.id]))
        .await
        .unwrap();

    let generated = library
        .generate(&GenerateStory {
            series_id: main,
            scenario: "Homecoming week".to_string(),
            character_ids: vec![ada.id],
            story_title: None,
            location: Some("Everglen High gym".to_string()),
            previous_story_id: Some(pilot.id),
            continuity: Some("direct sequel".to_string()),
            language: None,
        })
        .await
        .unwrap();

    assert_eq!(generated.title, "Homecoming");
    assert_eq!(generated.story, "The gym smelled of popcorn.");

    let user = driver.user_text(0);
    assert!(user.contains("Homecoming week"));
    assert!(user.contains("series_title='Everglen Nights'"));
    assert!(user.contains("location='Everglen High gym'"));
    assert!(user.contains("previous_story='Pilot in full'"));
    assert!(user.contains("Ada"));
    let system = driver.system_text(0);
    assert!(system.contains("using the direct sequel approach"));
    assert!(system.contains("in English"));
}

#[tokio::test]
async fn test_generate_unknown_previous_story() {
    let gateway = InMemoryGateway::new();
    let driver = MockDriver::new_texts(Vec::<String>::new());
    let library = library(&gateway, &driver);
    let main = series(&gateway, "Main").await;

    let err = library
        .generate(&GenerateStory {
            series_id: main,
            scenario: "Prom".to_string(),
            character_ids: vec![],
            story_title: None,
            location: None,
            previous_story_id: Some(StoryId(40)),
            continuity: None,
            language: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), EverglenErrorKind::Database(db) if db.is_not_found()));
    assert_eq!(driver.call_count(), 0);
}

#[tokio::test]
async fn test_plot_holes_for_series_in_episode_order() {
    let gateway = InMemoryGateway::new();
    let driver = MockDriver::new_texts([
        r#"{"plot_holes":["Ada is an only child in Story 1 but has a sister in Story 2"]}"#,
    ]);
    let library = library(&gateway, &driver);
    let main = series(&gateway, "Main").await;
    library.save_story(&from_plot(main, "One", vec![])).await.unwrap();
    library.save_story(&from_plot(main, "Two", vec![])).await.unwrap();

    let holes = library.plot_holes_for_series(main).await.unwrap();

    assert_eq!(holes.len(), 1);
    assert_eq!(
        driver.user_text(0),
        "Story 1:\nOne in full\n\nStory 2:\nTwo in full"
    );
}

#[tokio::test]
async fn test_plot_holes_for_empty_series() {
    let gateway = InMemoryGateway::new();
    let driver = MockDriver::new_texts(Vec::<String>::new());
    let library = library(&gateway, &driver);
    let main = series(&gateway, "Main").await;

    let err = library.plot_holes_for_series(main).await.unwrap_err();

    assert!(matches!(
        err.kind(),
        EverglenErrorKind::Narrative(e) if e.kind == NarrativeErrorKind::NoStories
    ));
    assert_eq!(driver.call_count(), 0);
}
