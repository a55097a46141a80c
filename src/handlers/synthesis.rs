use std::sync::Arc;

use axum::{
    Extension,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::auth::Auth;
use crate::core::error::error_codes;
use crate::core::poller::{CheckOutcome, PollMode};
use crate::core::service::StartRequest;
use crate::core::submitter::SubmitReceipt;
use crate::errors::app_error::{AppError, AppResult};
use crate::state::AppState;

/// Receipt plus the URL to poll for the result
#[derive(Debug, Serialize)]
pub struct BatchStartResponse {
    #[serde(flatten)]
    pub receipt: SubmitReceipt,
    pub status_check_url: String,
}

fn status_check_url(synthesis_id: &str) -> String {
    format!("/api/batch-check?synthesis_id={synthesis_id}")
}

/// Handler for `POST /api/batch-start`
pub async fn batch_start(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<Auth>,
    body: Result<Json<StartRequest>, axum::extract::rejection::JsonRejection>,
) -> AppResult<Json<BatchStartResponse>> {
    let Json(request) = body.map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;

    let receipt = state.service.start(&request).await?;
    info!(
        client = %auth.client(),
        synthesis_id = %receipt.job_id,
        "Batch synthesis started"
    );

    let status_check_url = status_check_url(&receipt.job_id);
    Ok(Json(BatchStartResponse {
        receipt,
        status_check_url,
    }))
}

#[derive(Debug, Deserialize)]
pub struct BatchCheckQuery {
    pub synthesis_id: Option<String>,
    /// Poll until done or out of attempts, default true
    pub wait: Option<bool>,
}

/// Handler for `GET /api/batch-check`
///
/// | outcome    | status |
/// |------------|--------|
/// | completed  | 200    |
/// | processing | 202    |
/// | timeout    | 408    |
/// | failed     | 500    |
pub async fn batch_check(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<Auth>,
    Query(query): Query<BatchCheckQuery>,
) -> AppResult<Response> {
    let mode = if query.wait.unwrap_or(true) {
        PollMode::Wait
    } else {
        PollMode::Once
    };
    let synthesis_id = query.synthesis_id.as_deref();
    info!(client = %auth.client(), synthesis_id = ?synthesis_id, ?mode, "Checking synthesis");

    let outcome = state.service.check(synthesis_id, mode).await?;
    let synthesis_id = synthesis_id.unwrap_or_default();

    let response = match outcome {
        CheckOutcome::Completed(audio) => (
            StatusCode::OK,
            Json(json!({
                "status": "completed",
                "synthesis_id": synthesis_id,
                "audio_url": audio.audio_url,
                "size_bytes": audio.size_bytes,
                "duration_seconds": audio.duration_seconds,
                "message": "Synthesis complete. Audio ready for download.",
            })),
        ),
        CheckOutcome::Processing { backend_status } => (
            StatusCode::ACCEPTED,
            Json(json!({
                "status": "processing",
                "synthesis_id": synthesis_id,
                "backend_status": backend_status,
                "message": "Synthesis still running. Check again shortly.",
            })),
        ),
        CheckOutcome::TimedOut { elapsed_seconds } => (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({
                "status": "timeout",
                "synthesis_id": synthesis_id,
                "elapsed_seconds": elapsed_seconds,
                "error_code": error_codes::SYNTHESIS_TIMEOUT,
                "message": format!(
                    "Synthesis still running after {elapsed_seconds} seconds. The job is not lost; retry this check later."
                ),
            })),
        ),
        CheckOutcome::Failed { error_detail } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "status": "failed",
                "synthesis_id": synthesis_id,
                "error": error_detail,
                "error_detail": error_detail,
                "error_code": error_codes::SYNTHESIS_FAILED,
            })),
        ),
    };

    Ok(response.into_response())
}
