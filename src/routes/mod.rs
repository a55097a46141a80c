pub mod api;

use std::sync::Arc;

use axum::{Router, middleware, routing::get};

use crate::handlers::api::health_check;
use crate::middleware::auth::auth_middleware;
use crate::state::AppState;

/// Public health check at `/` plus the authenticated API under `/api`
pub fn create_app(state: Arc<AppState>) -> Router {
    let protected_routes = api::create_api_router()
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/", get(health_check))
        .nest("/api", protected_routes)
        .with_state(state)
}
