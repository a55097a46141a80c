#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use bytes::Bytes;
use serde_json::Value;
use tower::ServiceExt;
use zip::write::SimpleFileOptions;

use tonisynth::config::{AuthApiSecret, DEFAULT_STORAGE_CONTAINER, SynthesisSettings};
use tonisynth::core::backend::ScriptedBackend;
use tonisynth::core::service::SynthesisService;
use tonisynth::core::speech::StaticSynthesizer;
use tonisynth::core::storage::BlobAudioStore;
use tonisynth::{ServerConfig, routes, state::AppState};

pub const RESULT_URL: &str = "https://results.example/job.zip";

pub fn test_config(auth_secret: Option<&str>) -> ServerConfig {
    ServerConfig {
        host: "localhost".to_string(),
        port: 7071,
        speech_subscription_key: None,
        speech_region: None,
        speech_endpoint: None,
        storage_account_name: None,
        storage_account_key: None,
        storage_container: DEFAULT_STORAGE_CONTAINER.to_string(),
        auth_api_secrets: auth_secret
            .map(|secret| {
                vec![AuthApiSecret {
                    id: "storybook".to_string(),
                    secret: secret.to_string(),
                }]
            })
            .unwrap_or_default(),
        auth_required: auth_secret.is_some(),
        synthesis: fast_settings(),
    }
}

/// Default settings with a poll loop that does not sleep
pub fn fast_settings() -> SynthesisSettings {
    SynthesisSettings {
        poll_interval: Duration::ZERO,
        max_poll_attempts: 3,
        ..Default::default()
    }
}

pub fn result_bundle() -> Bytes {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("0001.mp3", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"ID3-fake-audio").unwrap();
    Bytes::from(writer.finish().unwrap().into_inner())
}

pub fn app_with(config: ServerConfig, backend: Arc<ScriptedBackend>) -> Router {
    let service = SynthesisService::new(
        config.synthesis.clone(),
        backend,
        Arc::new(StaticSynthesizer::new(Bytes::from_static(b"RIFF-audio"))),
        Arc::new(BlobAudioStore::in_memory(&config.storage_container).unwrap()),
    );
    routes::create_app(AppState::with_service(config, service))
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
