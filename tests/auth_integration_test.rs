mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};

use common::{app_with, get, send, test_config};
use tonisynth::core::backend::ScriptedBackend;

const SECRET: &str = "bedtime-secret";

fn app() -> axum::Router {
    app_with(test_config(Some(SECRET)), Arc::new(ScriptedBackend::default()))
}

fn get_with_auth(uri: &str, authorization: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", authorization)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health_check_is_public() {
    let (status, _) = send(app(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_missing_credentials_rejected() {
    let (status, json) = send(app(), get("/api/voices")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error_code"], "missing_credentials");
}

#[tokio::test]
async fn test_bearer_secret_accepted() {
    let (status, _) = send(app(), get_with_auth("/api/voices", &format!("Bearer {SECRET}"))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_code_query_parameter_accepted() {
    let (status, _) = send(app(), get(&format!("/api/voices?code={SECRET}"))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_secret_rejected() {
    let (status, json) = send(app(), get_with_auth("/api/voices", "Bearer nope")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error_code"], "unauthorized");

    let (status, _) = send(app(), get("/api/voices?code=nope")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_header_rejected() {
    let (status, json) = send(app(), get_with_auth("/api/voices", SECRET)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error_code"], "invalid_auth_header");
}

#[tokio::test]
async fn test_auth_disabled_allows_anonymous_requests() {
    let app = app_with(test_config(None), Arc::new(ScriptedBackend::default()));
    let (status, _) = send(app, get("/api/voices")).await;
    assert_eq!(status, StatusCode::OK);
}
