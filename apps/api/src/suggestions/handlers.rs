use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;
use crate::suggestions::{suggest_jds, JdSuggestion};

#[derive(Deserialize)]
pub struct SuggestRequest {
    #[serde(default)]
    pub resume_texts: Vec<String>,
}

#[derive(Serialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<JdSuggestion>,
    /// False when no API key is configured; suggestions are then always empty.
    pub llm_enabled: bool,
}

/// POST /api/v1/jd-suggestions
pub async fn handle_suggest_jds(
    State(state): State<AppState>,
    payload: Result<Json<SuggestRequest>, JsonRejection>,
) -> Result<Json<SuggestResponse>, AppError> {
    let Json(req) = payload?;
    if req.resume_texts.is_empty() {
        return Err(AppError::Validation(
            "resume_texts must contain at least one resume".to_string(),
        ));
    }
    let suggestions = suggest_jds(state.llm.as_ref(), &req.resume_texts).await;
    Ok(Json(SuggestResponse {
        suggestions,
        llm_enabled: state.llm.is_some(),
    }))
}
