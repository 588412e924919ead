use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::text::{extract_text, DocumentFormat};
use crate::scoring::canonicalizer::Canonicalizer;
use crate::scoring::jd_config::{AreaWeights, Configuration};
use crate::scoring::ranker::{rank, Candidate, Ranking, RankingParams};
use crate::state::AppState;
use crate::taxonomy::{Role, RoleChoice};

// ─── Request / response shapes ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ConfigRequest {
    pub jd_text: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Serialize)]
pub struct ConfigResponse {
    pub role_label_inferred: bool,
    #[serde(flatten)]
    pub configuration: Configuration,
}

/// Per-request overrides; anything left out comes from `Config::ranking_defaults`.
#[derive(Debug, Default, Deserialize)]
pub struct ParamOverrides {
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub cutoff: Option<f64>,
    pub top_k: Option<usize>,
}

impl ParamOverrides {
    fn resolve(&self, defaults: &RankingParams) -> Result<RankingParams, AppError> {
        let params = RankingParams {
            alpha: self.alpha.unwrap_or(defaults.alpha),
            beta: self.beta.unwrap_or(defaults.beta),
            cutoff: self.cutoff.unwrap_or(defaults.cutoff),
            top_k: self.top_k.unwrap_or(defaults.top_k),
        };
        params.validate()?;
        Ok(params)
    }
}

#[derive(Deserialize)]
pub struct CandidateText {
    pub candidate_id: String,
    pub resume_text: String,
}

#[derive(Deserialize)]
pub struct ScoreRequest {
    pub jd_text: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(flatten)]
    pub params: ParamOverrides,
    #[serde(default)]
    pub candidates: Vec<CandidateText>,
}

/// Result of one scoring run.
#[derive(Serialize)]
pub struct RankingReport {
    pub run_id: Uuid,
    pub scored_at: DateTime<Utc>,
    pub role: Role,
    /// True when the role was inferred from the JD rather than pinned.
    pub role_label_inferred: bool,
    pub area_weights: AreaWeights,
    pub params: RankingParams,
    /// Structurer that produced the resume profiles ("llm" | "keyword").
    pub extractor: &'static str,
    #[serde(flatten)]
    pub ranking: Ranking,
}

// ─── Shared helpers ─────────────────────────────────────────────────────────

pub(crate) fn require_text<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed)
}

pub(crate) fn parse_role_choice(role: Option<&str>) -> Result<RoleChoice, AppError> {
    Ok(role.unwrap_or_default().parse()?)
}

/// Structures every resume with the configured structurer, then ranks them
/// on the blocking pool.
async fn score_candidates(
    state: &AppState,
    jd_text: &str,
    choice: RoleChoice,
    params: RankingParams,
    texts: Vec<(String, String)>,
) -> Result<RankingReport, AppError> {
    if texts.is_empty() {
        return Err(AppError::Validation(
            "at least one candidate is required".to_string(),
        ));
    }

    let config = Configuration::from_choice(choice, jd_text);
    let canon = Canonicalizer::new(config.aliases());

    let mut candidates = Vec::with_capacity(texts.len());
    for (candidate_id, resume_text) in texts {
        let resume = state
            .structurer
            .structure(&resume_text, &config, &canon)
            .await;
        candidates.push(Candidate {
            candidate_id,
            resume,
        });
    }

    let role = config.role();
    let area_weights = config.area_weights().clone();
    let jd = jd_text.to_string();
    let ranking = tokio::task::spawn_blocking(move || rank(&config, &jd, &candidates, &params))
        .await
        .context("ranking task failed")?;

    Ok(RankingReport {
        run_id: Uuid::new_v4(),
        scored_at: Utc::now(),
        role,
        role_label_inferred: choice == RoleChoice::Auto,
        area_weights,
        params,
        extractor: state.structurer.backend(),
        ranking,
    })
}

// ─── Handlers ───────────────────────────────────────────────────────────────

/// POST /api/v1/config
pub async fn handle_derive_config(
    payload: Result<Json<ConfigRequest>, JsonRejection>,
) -> Result<Json<ConfigResponse>, AppError> {
    let Json(req) = payload?;
    let jd_text = require_text("jd_text", &req.jd_text)?;
    let choice = parse_role_choice(req.role.as_deref())?;
    Ok(Json(ConfigResponse {
        role_label_inferred: choice == RoleChoice::Auto,
        configuration: Configuration::from_choice(choice, jd_text),
    }))
}

/// POST /api/v1/score
pub async fn handle_score(
    State(state): State<AppState>,
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<Json<RankingReport>, AppError> {
    let Json(req) = payload?;
    let jd_text = require_text("jd_text", &req.jd_text)?;
    let choice = parse_role_choice(req.role.as_deref())?;
    let params = req.params.resolve(&state.config.ranking_defaults)?;

    let texts = req
        .candidates
        .into_iter()
        .map(|c| (c.candidate_id, c.resume_text))
        .collect();

    let report = score_candidates(&state, jd_text, choice, params, texts).await?;
    Ok(Json(report))
}

fn parse_number<T: std::str::FromStr>(field: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("{field} must be a number, got '{raw}'")))
}

/// POST /api/v1/score/upload
///
/// Multipart fields: `jd_text`, optional `role` / `alpha` / `beta` / `cutoff` /
/// `top_k`, and one `resume` file part per candidate (pdf or txt). Candidates
/// are identified by file name.
pub async fn handle_score_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<RankingReport>, AppError> {
    let mut jd_text = String::new();
    let mut role: Option<String> = None;
    let mut overrides = ParamOverrides::default();
    let mut texts = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let file = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Validation("resume part needs a file name".to_string()))?;
                let format = DocumentFormat::from_file_name(&file).map_err(|source| {
                    AppError::Extraction {
                        file: file.clone(),
                        source,
                    }
                })?;
                let bytes = field.bytes().await?;
                let text = tokio::task::spawn_blocking(move || extract_text(&bytes, format))
                    .await
                    .context("text extraction task failed")?
                    .map_err(|source| AppError::Extraction {
                        file: file.clone(),
                        source,
                    })?;
                texts.push((file, text));
            }
            "jd_text" => jd_text = field.text().await?,
            "role" => role = Some(field.text().await?),
            "alpha" => overrides.alpha = Some(parse_number("alpha", &field.text().await?)?),
            "beta" => overrides.beta = Some(parse_number("beta", &field.text().await?)?),
            "cutoff" => overrides.cutoff = Some(parse_number("cutoff", &field.text().await?)?),
            "top_k" => overrides.top_k = Some(parse_number("top_k", &field.text().await?)?),
            _ => {}
        }
    }

    let jd_text = require_text("jd_text", &jd_text)?;
    let choice = parse_role_choice(role.as_deref())?;
    let params = overrides.resolve(&state.config.ranking_defaults)?;

    let report = score_candidates(&state, jd_text, choice, params, texts).await?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_fall_back_to_defaults() {
        let defaults = RankingParams::default();
        let overrides = ParamOverrides {
            alpha: Some(0.9),
            top_k: Some(2),
            ..Default::default()
        };
        let params = overrides.resolve(&defaults).unwrap();
        assert_eq!(params.alpha, 0.9);
        assert_eq!(params.top_k, 2);
        assert_eq!(params.beta, defaults.beta);
        assert_eq!(params.cutoff, defaults.cutoff);
    }

    #[test]
    fn test_invalid_overrides_are_rejected() {
        let overrides = ParamOverrides {
            beta: Some(0.0),
            ..Default::default()
        };
        assert!(matches!(
            overrides.resolve(&RankingParams::default()),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_require_text_and_role_parsing() {
        assert!(require_text("jd_text", "  \n").is_err());
        assert_eq!(require_text("jd_text", " React ").unwrap(), "React");
        assert_eq!(parse_role_choice(None).unwrap(), RoleChoice::Auto);
        assert_eq!(
            parse_role_choice(Some("backend")).unwrap(),
            RoleChoice::Fixed(Role::Backend)
        );
        assert!(parse_role_choice(Some("designer")).is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number::<f64>("alpha", " 0.5 ").unwrap(), 0.5);
        assert!(parse_number::<usize>("top_k", "-1").is_err());
    }

    #[tokio::test]
    async fn test_score_candidates_orders_and_reports() {
        let state = AppState::from_config(crate::config::Config::for_tests());
        let jd = "Frontend engineer: React, Redux, Jest, Lighthouse, Vite.";
        let texts = vec![
            ("weak".to_string(), "Barista who enjoys latte art.".to_string()),
            (
                "strong".to_string(),
                "React and Redux apps tested with Jest; Lighthouse audits; Vite builds.".to_string(),
            ),
        ];
        let report = score_candidates(&state, jd, RoleChoice::Auto, RankingParams::default(), texts)
            .await
            .unwrap();

        assert_eq!(report.role, Role::Frontend);
        assert!(report.role_label_inferred);
        assert_eq!(report.extractor, "keyword");
        assert_eq!(report.ranking.ranked[0].candidate_id, "strong");
        assert_eq!(report.ranking.ranked[1].score.hybrid, 0.0);
        assert_eq!(
            report.ranking.shortlist.len() + report.ranking.rejected.len(),
            2
        );
    }

    #[tokio::test]
    async fn test_score_candidates_requires_candidates() {
        let state = AppState::from_config(crate::config::Config::for_tests());
        let result =
            score_candidates(&state, "React", RoleChoice::Auto, RankingParams::default(), vec![]).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
