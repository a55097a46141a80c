mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use common::{RESULT_URL, app_with, get, post_json, result_bundle, send, test_config};
use tonisynth::core::backend::{BackendJobStatus, ScriptedBackend, StatusReport};
use tonisynth::core::error::BackendError;

#[tokio::test]
async fn test_health_check() {
    let app = app_with(test_config(None), Arc::new(ScriptedBackend::default()));
    let (status, json) = send(app, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "OK");
}

#[tokio::test]
async fn test_voices_catalogue() {
    let app = app_with(test_config(None), Arc::new(ScriptedBackend::default()));
    let (status, json) = send(app, get("/api/voices")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["voices"].as_array().unwrap().len(), 5);
    assert_eq!(json["presets"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_batch_start_returns_receipt() {
    let backend = Arc::new(ScriptedBackend::default());
    let app = app_with(test_config(None), backend.clone());

    let (status, json) = send(
        app,
        post_json(
            "/api/batch-start",
            &json!({"text": "Once upon a time, a brave dragon...", "preset": "adventure"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "started");
    let synthesis_id = json["synthesis_id"].as_str().unwrap();
    assert!(synthesis_id.starts_with("once-upon-a-time-a-brave_"));
    assert_eq!(
        json["status_check_url"],
        format!("/api/batch-check?synthesis_id={synthesis_id}")
    );
    assert_eq!(json["voice"], "en-US-DavisNeural");
    assert_eq!(json["style"], "excited");
    assert!(json["audio_url"].as_str().unwrap().contains(synthesis_id));
    assert_eq!(backend.created_jobs().await.len(), 1);
}

#[tokio::test]
async fn test_batch_start_validation_error() {
    let backend = Arc::new(ScriptedBackend::default());
    let app = app_with(test_config(None), backend.clone());

    let (status, json) = send(
        app,
        post_json("/api/batch-start", &json!({"text": "Hi", "style": "sarcastic"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_code"], "VALIDATION_ERROR");
    assert_eq!(json["field"], "style");
    assert!(backend.created_jobs().await.is_empty());
}

#[tokio::test]
async fn test_batch_start_missing_text() {
    let app = app_with(test_config(None), Arc::new(ScriptedBackend::default()));
    let (status, json) = send(app, post_json("/api/batch-start", &json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "text is required");
    assert_eq!(json["field"], "text");
}

#[tokio::test]
async fn test_batch_start_backend_failure() {
    let backend = Arc::new(ScriptedBackend::default().with_create_error(BackendError::Http {
        status: 401,
        body: "Access denied due to invalid subscription key".to_string(),
    }));
    let app = app_with(test_config(None), backend);

    let (status, json) = send(
        app,
        post_json("/api/batch-start", &json!({"text": "A short story"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error_code"], "SPEECH_SERVICE_ERROR");
    assert!(json["details"].as_str().unwrap().contains("invalid subscription key"));
}

#[tokio::test]
async fn test_batch_check_missing_id() {
    let app = app_with(test_config(None), Arc::new(ScriptedBackend::default()));
    let (status, json) = send(app, get("/api/batch-check")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["field"], "synthesis_id");
}

#[tokio::test]
async fn test_batch_check_unknown_job() {
    let app = app_with(test_config(None), Arc::new(ScriptedBackend::default()));
    let (status, json) = send(app, get("/api/batch-check?synthesis_id=missing_1a2b3c4d")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error_code"], "SYNTHESIS_NOT_FOUND");
}

#[tokio::test]
async fn test_batch_check_completed() {
    let backend = Arc::new(ScriptedBackend::succeeding_after(
        1,
        RESULT_URL,
        result_bundle(),
    ));
    let app = app_with(test_config(None), backend);

    let (status, json) = send(app, get("/api/batch-check?synthesis_id=a-story_1a2b3c4d")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "completed");
    assert_eq!(json["synthesis_id"], "a-story_1a2b3c4d");
    assert_eq!(json["size_bytes"], 14);
    assert!(json["duration_seconds"].is_null());
    assert!(
        json["audio_url"]
            .as_str()
            .unwrap()
            .contains("/audio-files/a-story_1a2b3c4d.mp3?")
    );
}

#[tokio::test]
async fn test_batch_check_without_waiting() {
    let backend = Arc::new(ScriptedBackend::succeeding_after(
        2,
        RESULT_URL,
        result_bundle(),
    ));
    let app = app_with(test_config(None), backend.clone());

    let (status, json) = send(
        app,
        get("/api/batch-check?synthesis_id=a-story_1a2b3c4d&wait=false"),
    )
    .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json["status"], "processing");
    assert_eq!(json["backend_status"], "Running");
    assert_eq!(backend.status_queries(), 1);
}

#[tokio::test]
async fn test_batch_check_timeout() {
    let backend = Arc::new(ScriptedBackend::new(vec![StatusReport::new(
        BackendJobStatus::Running,
    )]));
    let app = app_with(test_config(None), backend.clone());

    let (status, json) = send(app, get("/api/batch-check?synthesis_id=a-story_1a2b3c4d")).await;

    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(json["status"], "timeout");
    assert_eq!(json["elapsed_seconds"], 0);
    assert!(json["message"].as_str().unwrap().contains("retry"));
    assert_eq!(backend.status_queries(), 3);
}

#[tokio::test]
async fn test_batch_check_failed() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        StatusReport::new(BackendJobStatus::Failed).with_failure_reason("Invalid SSML"),
    ]));
    let app = app_with(test_config(None), backend);

    let (status, json) = send(app, get("/api/batch-check?synthesis_id=a-story_1a2b3c4d")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["status"], "failed");
    assert_eq!(json["error"], "Invalid SSML");
    assert_eq!(json["error_detail"], "Invalid SSML");
    assert_eq!(json["error_code"], "SYNTHESIS_FAILED");
}

#[tokio::test]
async fn test_sync_tts() {
    let app = app_with(test_config(None), Arc::new(ScriptedBackend::default()));
    let (status, json) = send(
        app,
        post_json("/api/sync-tts", &json!({"text": "Good night, little star"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
    assert_eq!(json["voice"], "en-US-GuyNeural");
    assert_eq!(json["size_bytes"], 10);
    assert!(
        json["filename"]
            .as_str()
            .unwrap()
            .starts_with("good-night-little-star_")
    );
}

#[tokio::test]
async fn test_sync_tts_rejects_long_text() {
    let app = app_with(test_config(None), Arc::new(ScriptedBackend::default()));
    let (status, json) = send(
        app,
        post_json("/api/sync-tts", &json!({"text": "a".repeat(5001)})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_code"], "TEXT_TOO_LONG");
    assert_eq!(json["details"], "Text length (5001) exceeds maximum (5000)");
}
