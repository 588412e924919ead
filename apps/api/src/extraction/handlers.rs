use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::resume::ResumeStruct;
use crate::scoring::canonicalizer::Canonicalizer;
use crate::scoring::handlers::{parse_role_choice, require_text};
use crate::scoring::jd_config::Configuration;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct StructureRequest {
    pub resume_text: String,
    pub jd_text: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// POST /api/v1/resumes/structure
///
/// Structures one resume against the configuration derived from `jd_text`,
/// so skill names come back canonicalized with that configuration's aliases.
pub async fn handle_structure_resume(
    State(state): State<AppState>,
    payload: Result<Json<StructureRequest>, JsonRejection>,
) -> Result<Json<ResumeStruct>, AppError> {
    let Json(req) = payload?;
    let resume_text = require_text("resume_text", &req.resume_text)?;
    let jd_text = require_text("jd_text", &req.jd_text)?;
    let choice = parse_role_choice(req.role.as_deref())?;

    let config = Configuration::from_choice(choice, jd_text);
    let canon = Canonicalizer::new(config.aliases());
    let resume = state.structurer.structure(resume_text, &config, &canon).await;
    Ok(Json(resume))
}
