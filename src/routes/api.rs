use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{sync_tts, synthesis, voices};
use crate::state::AppState;
use std::sync::Arc;

pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Protected routes (auth required)
        .route("/batch-start", post(synthesis::batch_start))
        .route("/batch-check", get(synthesis::batch_check))
        .route("/sync-tts", post(sync_tts::sync_tts))
        .route("/voices", get(voices::list_voices))
        .layer(TraceLayer::new_for_http())
}
