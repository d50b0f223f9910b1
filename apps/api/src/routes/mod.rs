pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::documents::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Legacy per-document endpoints
        .route(
            "/api/generate-blueprint",
            post(handlers::handle_clarity_map).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/generate-project-brief",
            post(handlers::handle_project_brief).fallback(handlers::method_not_allowed),
        )
        // Documents API
        .route("/api/v1/documents", get(handlers::handle_list_documents))
        .route(
            "/api/v1/documents/:kind",
            post(handlers::handle_generate).fallback(handlers::method_not_allowed),
        )
        .with_state(state)
}
