pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Résumé analysis API
        .route(
            "/api/resume/analyze-deepseek",
            post(handlers::handle_analyze_lexical),
        )
        .route(
            "/api/resume/analyze-gemini",
            post(handlers::handle_analyze_structured),
        )
        .layer(body_limit)
        .with_state(state)
}
