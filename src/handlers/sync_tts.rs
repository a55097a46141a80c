use std::sync::Arc;

use axum::{
    Extension,
    extract::{State, rejection::JsonRejection},
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::Auth;
use crate::core::service::SpokenAudio;
use crate::errors::app_error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for the synchronous endpoint
#[derive(Debug, Deserialize)]
pub struct SyncTtsRequest {
    pub text: Option<String>,
    pub voice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SyncTtsResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub audio: SpokenAudio,
}

/// Handler for `POST /api/sync-tts`
///
/// Short texts only; longer ones are rejected with a pointer to batch-start.
pub async fn sync_tts(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<Auth>,
    body: Result<Json<SyncTtsRequest>, JsonRejection>,
) -> AppResult<Json<SyncTtsResponse>> {
    let Json(request) = body.map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;

    let audio = state
        .service
        .speak_now(request.text.as_deref(), request.voice.as_deref())
        .await?;
    info!(
        client = %auth.client(),
        filename = %audio.filename,
        size_bytes = audio.size_bytes,
        "Synchronous synthesis complete"
    );

    Ok(Json(SyncTtsResponse {
        status: "success",
        audio,
    }))
}
