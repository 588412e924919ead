pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::extraction::handlers as extraction;
use crate::scoring::handlers as scoring;
use crate::state::AppState;
use crate::suggestions::handlers as suggestions;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Scoring
        .route("/api/v1/config", post(scoring::handle_derive_config))
        .route("/api/v1/score", post(scoring::handle_score))
        .route("/api/v1/score/upload", post(scoring::handle_score_upload))
        // Extraction
        .route(
            "/api/v1/resumes/structure",
            post(extraction::handle_structure_resume),
        )
        // Suggestions
        .route("/api/v1/jd-suggestions", post(suggestions::handle_suggest_jds))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
