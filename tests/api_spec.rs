mod common;

use std::sync::Arc;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{FakeWakeLock, RecordingAlerts};
use rest_timer::{
    api::create_router,
    settings::{MemoryStore, Settings, SettingsStore},
    state::AppState,
    tasks::ScreenController,
};

fn setup() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new(Settings {
        rest_seconds: 5,
        ..Settings::default()
    }));
    let (controller, handle) = ScreenController::new(
        store.clone(),
        RecordingAlerts::default(),
        FakeWakeLock::default(),
    );
    tokio::spawn(controller.run());

    let state = Arc::new(AppState::new(handle, store.clone(), 20555, "127.0.0.1".to_string()));
    (create_router(state), store)
}

async fn request(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = setup();

    let (status, body) = request(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn tap_toggles_rest() {
    let (app, _) = setup();

    let (status, body) = request(&app, "POST", "/tap", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "resting");
    assert_eq!(body["countdown"]["frame"]["countdown"], "5");
    assert_eq!(body["countdown"]["frame"]["background"], "resting");

    let (status, body) = request(&app, "POST", "/tap", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "idle");
    assert_eq!(body["countdown"]["frame"]["countdown"], "");
}

#[tokio::test]
async fn camera_starts_rest() {
    let (app, _) = setup();

    let (status, body) = request(&app, "POST", "/camera", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["countdown"]["counting"], true);
}

#[tokio::test]
async fn duration_edits_persist_only_numbers() {
    let (app, store) = setup();

    let (status, body) = request(&app, "PUT", "/duration", Some(json!({ "text": "abc" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["countdown"]["duration_text"], "abc");
    assert_eq!(store.load().unwrap().rest_seconds, 5);

    request(&app, "PUT", "/duration", Some(json!({ "text": "12" }))).await;
    assert_eq!(store.load().unwrap().rest_seconds, 12);
}

#[tokio::test]
async fn settings_round_trip_with_stored_keys() {
    let (app, _) = setup();

    let (status, body) = request(&app, "GET", "/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["restSeconds"], 5);
    assert_eq!(body["startTimerControl"], "both");

    let (status, body) = request(
        &app,
        "PUT",
        "/settings",
        Some(json!({ "restSeconds": 60, "startTimerControl": "camera", "playSound": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["startTimerControl"], "camera");
    assert_eq!(body["vibrate"], true);

    // Tap is now ignored
    let (_, body) = request(&app, "POST", "/tap", None).await;
    assert_eq!(body["status"], "idle");
    assert_eq!(body["countdown"]["duration_text"], "60");
}

#[tokio::test]
async fn partial_settings_keep_stored_values() {
    let (app, store) = setup();

    request(&app, "PUT", "/settings", Some(json!({ "vibrate": false, "playSound": false }))).await;
    let (status, body) = request(&app, "PUT", "/settings", Some(json!({ "startTimerControl": "tap" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["startTimerControl"], "tap");
    assert_eq!(body["vibrate"], false);
    assert_eq!(body["playSound"], false);
    assert_eq!(body["restSeconds"], 5);

    let stored = store.load().unwrap();
    assert!(!stored.vibrate);
    assert!(!stored.play_sound);
}

#[tokio::test]
async fn zero_rest_is_rejected() {
    let (app, store) = setup();

    let (status, body) = request(&app, "PUT", "/settings", Some(json!({ "restSeconds": 0 }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("restSeconds"));
    assert_eq!(store.load().unwrap().rest_seconds, 5);
}

#[tokio::test]
async fn status_reports_last_action_and_lock() {
    let (app, _) = setup();

    let (_, body) = request(&app, "POST", "/resume", None).await;
    assert_eq!(body["countdown"]["wake_lock_held"], true);

    let (status, body) = request(&app, "GET", "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["last_action"], "resume");
    assert_eq!(body["settings"]["restSeconds"], 5);
    assert_eq!(body["countdown"]["wake_lock_held"], true);
    assert_eq!(body["port"], 20555);

    let (_, body) = request(&app, "POST", "/pause", None).await;
    assert_eq!(body["countdown"]["wake_lock_held"], false);
}
