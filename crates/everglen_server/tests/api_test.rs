//! Router behavior against the in-memory gateway and a scripted driver.

mod test_utils;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use everglen_core::DefaultsConfig;
use everglen_database::{InMemoryGateway, seed_demo_cast};
use everglen_narrative::{NarrativePipeline, StoryLibrary};
use everglen_server::{AppState, create_router};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use test_utils::{MockDriver, MockResponse};
use tower::ServiceExt;

fn app(gateway: &InMemoryGateway, driver: &MockDriver) -> Router {
    let library = StoryLibrary::new(
        Arc::new(gateway.clone()),
        NarrativePipeline::new(Arc::new(driver.clone())),
        DefaultsConfig::default(),
    );
    create_router(AppState::new(Arc::new(library)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(
        app(&InMemoryGateway::new(), &MockDriver::new_texts(Vec::<String>::new())),
        get("/health"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_add_and_list_characters() {
    let gateway = InMemoryGateway::new();
    let driver = MockDriver::new_texts(Vec::<String>::new());

    let (status, body) = send(
        app(&gateway, &driver),
        post(
            "/api/characters/add",
            "name=Zoe+Quill&age=16&gender=female&personality=sharp&high_school_clique=debate\
             &current_job=&native_languages%5B0%5D=English",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["character_id"], 1);
    assert_eq!(body["message"], "CHARACTER_ADDED");
    assert_eq!(body["status"], "OK");

    send(
        app(&gateway, &driver),
        post(
            "/api/characters/add",
            "name=Ada&age=17&gender=female&personality=calm",
        ),
    )
    .await;

    let (status, body) = send(app(&gateway, &driver), get("/api/characters/list")).await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["character_name"], "Ada");
    assert_eq!(list[1]["character_name"], "Zoe Quill");
    assert_eq!(list[1]["high_school_clique"], "debate");
    assert!(list[1]["current_job"].is_null());
}

#[tokio::test]
async fn test_add_character_missing_field() {
    let (status, body) = send(
        app(&InMemoryGateway::new(), &MockDriver::new_texts(Vec::<String>::new())),
        post("/api/characters/add", "name=Ada&gender=female&personality=calm"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("'age'"));
    assert_eq!(body["category"], "other");
}

#[tokio::test]
async fn test_edit_character() {
    let gateway = InMemoryGateway::new();
    let driver = MockDriver::new_texts(Vec::<String>::new());
    seed_demo_cast(&gateway).await.unwrap();

    let (status, body) = send(
        app(&gateway, &driver),
        post(
            "/api/characters/edit",
            "character_id=2&name=Cameron+Bandage&age=25&gender=male&personality=gruff",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "CHARACTER_UPDATED");

    let (_, body) = send(app(&gateway, &driver), get("/api/characters/view/2")).await;
    assert_eq!(body["character"]["character_age"], 25);
    assert!(body["character"]["outfit"].is_null());
}

#[tokio::test]
async fn test_view_character_with_relationships() {
    let gateway = InMemoryGateway::new();
    let driver = MockDriver::new_texts(Vec::<String>::new());
    seed_demo_cast(&gateway).await.unwrap();

    let (status, body) = send(app(&gateway, &driver), get("/api/characters/view/2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["character"]["character_name"], "Cameron Bandage");
    let relationships = body["relationships"].as_array().unwrap();
    assert_eq!(relationships.len(), 1);
    assert_eq!(relationships[0]["relation"], "boyfriends");
    assert_eq!(relationships[0]["relation_subject"], 1);
    assert_eq!(relationships[0]["relation_object"], 2);
}

#[tokio::test]
async fn test_view_unknown_character() {
    let (status, body) = send(
        app(&InMemoryGateway::new(), &MockDriver::new_texts(Vec::<String>::new())),
        get("/api/characters/view/7"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("character 7 not found"));
}

#[tokio::test]
async fn test_relationship_add_and_edit() {
    let gateway = InMemoryGateway::new();
    let driver = MockDriver::new_texts(Vec::<String>::new());
    seed_demo_cast(&gateway).await.unwrap();

    let (status, body) = send(
        app(&gateway, &driver),
        post(
            "/api/relationships/add",
            "relation_subject=2&relation_object=1&relation=lab+partners",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["relation_id"], 2);
    assert_eq!(body["message"], "CONNECTION_ADDED");

    let (status, body) = send(
        app(&gateway, &driver),
        post(
            "/api/relationships/edit",
            "relation_id=2&relation_subject=2&relation_object=1&relation=rivals",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "CONNECTION_UPDATED");

    let (status, _) = send(
        app(&gateway, &driver),
        post(
            "/api/relationships/add",
            "relation_subject=2&relation_object=99&relation=strangers",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_scan_characters() {
    let driver = MockDriver::new_texts([
        r#"{"characters":[{"name":"Yitzhak","current_job":"librarian"}]}"#,
    ]);
    let (status, body) = send(
        app(&InMemoryGateway::new(), &driver),
        post("/api/characters/scan", "story=Yitzhak+laughed+nervously."),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["characters"][0]["name"], "Yitzhak");
    assert!(driver.user_text(0).contains("Yitzhak laughed nervously."));
}

#[tokio::test]
async fn test_generate_save_and_list_series() {
    let gateway = InMemoryGateway::new();
    seed_demo_cast(&gateway).await.unwrap();
    let driver = MockDriver::new_texts([
        r#"{"title":"Catalog Chaos","characters":["Max","Cameron"],"plot":"They hunt for a book"}"#,
        "The kiosk blinked awake.",
    ]);

    let (status, body) = send(
        app(&gateway, &driver),
        post("/api/series/add", "series_name=Faculty+Lounge&series_desc=Teachers"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["series_id"], 1);
    assert_eq!(body["message"], "SERIES_ADDED");

    let (status, body) = send(
        app(&gateway, &driver),
        post(
            "/api/stories/generate",
            "summary=Library+race&location=Everglen&series%5Bid%5D=1\
             &characters%5B0%5D%5Bid%5D=1&characters%5B1%5D%5Bid%5D=2",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["story_title"], "Catalog Chaos");
    assert_eq!(body["plot"], "They hunt for a book");
    assert_eq!(body["story"], "The kiosk blinked awake.");
    assert!(
        driver
            .user_text(0)
            .contains("Max Supernova and Cameron Bandage are boyfriends")
    );

    let (status, body) = send(
        app(&gateway, &driver),
        post(
            "/api/stories/save",
            "story_origin=generated_from_plot&series%5Bid%5D=1&story_title=Catalog+Chaos\
             &plot=They+hunt+for+a+book&location=Everglen%2C+NY&full_story=The+kiosk+blinked+awake.\
             &characters%5B0%5D%5Bid%5D=1&characters%5B1%5D%5Bid%5D=2",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "STORY_ADDED");
    assert_eq!(body["episode_number"], 1);

    let (status, body) = send(app(&gateway, &driver), get("/api/series/list")).await;
    assert_eq!(status, StatusCode::OK);
    let series = body.as_array().unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0]["series_name"], "Faculty Lounge");
    assert_eq!(series[0]["stories"][0]["story_title"], "Catalog Chaos");
    assert_eq!(series[0]["stories"][0]["location"], "Everglen, NY");
}

#[tokio::test]
async fn test_generate_invalid_json_is_bad_gateway() {
    let gateway = InMemoryGateway::new();
    let driver = MockDriver::new_texts(["Sorry, I can only write prose."]);
    send(
        app(&gateway, &driver),
        post("/api/series/add", "series_name=S&series_desc=D"),
    )
    .await;

    let (status, body) = send(
        app(&gateway, &driver),
        post("/api/stories/generate", "summary=Prom&series%5Bid%5D=1"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["category"], "response_parse");
    assert_eq!(driver.call_count(), 1);
}

#[tokio::test]
async fn test_generate_blank_plot_is_bad_gateway() {
    let gateway = InMemoryGateway::new();
    let driver = MockDriver::new_texts([r#"{"title":"T","characters":[],"plot":""}"#]);
    send(
        app(&gateway, &driver),
        post("/api/series/add", "series_name=S&series_desc=D"),
    )
    .await;

    let (status, body) = send(
        app(&gateway, &driver),
        post("/api/stories/generate", "summary=Prom&series%5Bid%5D=1"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["category"], "response_parse");
    assert_eq!(driver.call_count(), 1);
}

#[tokio::test]
async fn test_error_body_hides_source_location() {
    let (status, body) = send(
        app(&InMemoryGateway::new(), &MockDriver::new_texts(Vec::<String>::new())),
        post("/api/characters/add", "name=Ada&gender=female&personality=calm"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert_eq!(message, "Missing required field 'age'");
    assert!(!message.contains(".rs"));
}

#[tokio::test]
async fn test_generate_non_integer_series() {
    let (status, body) = send(
        app(&InMemoryGateway::new(), &MockDriver::new_texts(Vec::<String>::new())),
        post("/api/stories/generate", "summary=Prom&series%5Bid%5D=first"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("series[id]"));
}

#[tokio::test]
async fn test_humanize_reports_failed_stage() {
    let gateway = InMemoryGateway::new();
    let driver = MockDriver::new_sequence(vec![
        MockResponse::text("A warmer draft."),
        MockResponse::status(503),
    ]);

    let (status, body) = send(
        app(&gateway, &driver),
        post("/api/stories/humanize", "original_story=A+cold+draft."),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["category"], "service_unavailable");
    assert_eq!(body["stage"], "title");
}

#[tokio::test]
async fn test_humanize_complete() {
    let gateway = InMemoryGateway::new();
    let driver = MockDriver::new_texts(["A warmer draft.", "Warm Hearts"]);

    let (status, body) = send(
        app(&gateway, &driver),
        post("/api/stories/humanize", "original_story=A+cold+draft."),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["output"]["improved_story"], "A warmer draft.");
    assert_eq!(body["output"]["title"], "Warm Hearts");
}

#[tokio::test]
async fn test_plot_holes_endpoint() {
    let gateway = InMemoryGateway::new();
    let driver = MockDriver::new_sequence(vec![MockResponse::text(
        r#"{"plot_holes":["The library closed in episode 1 but is open in episode 2"]}"#,
    )]);
    send(
        app(&gateway, &driver),
        post("/api/series/add", "series_name=S&series_desc=D"),
    )
    .await;
    for title in ["One", "Two"] {
        send(
            app(&gateway, &driver),
            post(
                "/api/stories/save",
                &format!(
                    "story_origin=generated_from_plot&series%5Bid%5D=1&story_title={0}\
                     &plot=P&location=L&full_story={0}+text",
                    title
                ),
            ),
        )
        .await;
    }

    let (status, body) = send(
        app(&gateway, &driver),
        post("/api/stories/plot-holes", "series%5Bid%5D=1"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["plot_holes"].as_array().unwrap().len(), 1);
    assert_eq!(
        driver.user_text(0),
        "Story 1:\nOne text\n\nStory 2:\nTwo text"
    );
}

#[tokio::test]
async fn test_plot_holes_empty_series() {
    let gateway = InMemoryGateway::new();
    let driver = MockDriver::new_texts(Vec::<String>::new());
    send(
        app(&gateway, &driver),
        post("/api/series/add", "series_name=S&series_desc=D"),
    )
    .await;

    let (status, _) = send(
        app(&gateway, &driver),
        post("/api/stories/plot-holes", "series%5Bid%5D=1"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(driver.call_count(), 0);
}
