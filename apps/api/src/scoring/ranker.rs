//! Ranker: scores every candidate against one configuration and splits the
//! result into a shortlist and a rejected list.
//!
//! Candidates are scored in parallel (rayon); the collect keeps input order so
//! the stable sort below breaks ties by submission order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::models::resume::ResumeStruct;
use crate::scoring::engine::{hybrid, HybridScore};
use crate::scoring::jd_config::Configuration;

/// Tunable blend and shortlist parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingParams {
    /// Weight of Fβ against the technical score, in [0, 1].
    pub alpha: f64,
    /// Fβ recall emphasis, > 0.
    pub beta: f64,
    /// Minimum hybrid score to be shortlisted, in [0, 100].
    pub cutoff: f64,
    /// Maximum shortlist size, ≥ 1.
    pub top_k: usize,
}

impl Default for RankingParams {
    fn default() -> Self {
        Self {
            alpha: 0.4,
            beta: 1.5,
            cutoff: 75.0,
            top_k: 5,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("alpha must be within [0, 1], got {0}")]
    Alpha(f64),
    #[error("beta must be positive, got {0}")]
    Beta(f64),
    #[error("cutoff must be within [0, 100], got {0}")]
    Cutoff(f64),
    #[error("top_k must be at least 1")]
    TopK,
}

impl RankingParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(ParamsError::Alpha(self.alpha));
        }
        if !(self.beta > 0.0 && self.beta.is_finite()) {
            return Err(ParamsError::Beta(self.beta));
        }
        if !(0.0..=100.0).contains(&self.cutoff) {
            return Err(ParamsError::Cutoff(self.cutoff));
        }
        if self.top_k == 0 {
            return Err(ParamsError::TopK);
        }
        Ok(())
    }
}

/// One resume to rank, keyed by a caller-chosen id (file name, uuid, ...).
#[derive(Debug, Clone)]
pub struct Candidate {
    pub candidate_id: String,
    pub resume: ResumeStruct,
}

/// The directional score a rejected candidate fell shortest on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dimension {
    #[serde(rename = "L→R")]
    LeftToRight,
    #[serde(rename = "R→L")]
    RightToLeft,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    /// 1-based position after sorting.
    pub rank: usize,
    pub candidate_id: String,
    pub score: HybridScore,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateSummary {
    pub candidate_id: String,
    pub hybrid: f64,
    pub technical: f64,
    pub left_to_right: f64,
    pub right_to_left: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedCandidate {
    #[serde(flatten)]
    pub summary: CandidateSummary,
    pub weakest: Dimension,
}

#[derive(Debug, Clone, Serialize)]
pub struct Ranking {
    pub ranked: Vec<RankedCandidate>,
    pub shortlist: Vec<CandidateSummary>,
    pub rejected: Vec<RejectedCandidate>,
}

impl RankedCandidate {
    fn summary(&self) -> CandidateSummary {
        CandidateSummary {
            candidate_id: self.candidate_id.clone(),
            hybrid: self.score.hybrid,
            technical: self.score.technical,
            left_to_right: self.score.left_to_right,
            right_to_left: self.score.right_to_left,
        }
    }
}

fn weakest_dimension(score: &HybridScore) -> Dimension {
    if score.left_to_right < score.right_to_left {
        Dimension::LeftToRight
    } else {
        Dimension::RightToLeft
    }
}

/// Scores, sorts and shortlists the candidates.
pub fn rank(
    config: &Configuration,
    jd_text: &str,
    candidates: &[Candidate],
    params: &RankingParams,
) -> Ranking {
    let mut scored: Vec<(String, HybridScore)> = candidates
        .par_iter()
        .map(|c| {
            let score = hybrid(config, jd_text, &c.resume, params.alpha, params.beta);
            (c.candidate_id.clone(), score)
        })
        .collect();

    // stable: equal scores keep submission order
    scored.sort_by(|a, b| b.1.hybrid.total_cmp(&a.1.hybrid));

    let ranked: Vec<RankedCandidate> = scored
        .into_iter()
        .enumerate()
        .map(|(i, (candidate_id, score))| RankedCandidate {
            rank: i + 1,
            candidate_id,
            score,
        })
        .collect();

    let shortlisted: Vec<usize> = ranked
        .iter()
        .enumerate()
        .filter(|(_, c)| c.score.hybrid >= params.cutoff)
        .map(|(i, _)| i)
        .take(params.top_k)
        .collect();

    let shortlist = shortlisted.iter().map(|&i| ranked[i].summary()).collect::<Vec<_>>();
    let rejected = ranked
        .iter()
        .enumerate()
        .filter(|(i, _)| !shortlisted.contains(i))
        .map(|(_, c)| RejectedCandidate {
            summary: c.summary(),
            weakest: weakest_dimension(&c.score),
        })
        .collect::<Vec<_>>();

    info!(
        role = %config.role(),
        candidates = ranked.len(),
        shortlisted = shortlist.len(),
        cutoff = params.cutoff,
        "ranked candidates"
    );

    Ranking {
        ranked,
        shortlist,
        rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{LevelHint, SkillItem};
    use crate::taxonomy::Role;

    fn candidate(id: &str, skills: &[(&str, LevelHint, usize)]) -> Candidate {
        let skills = skills
            .iter()
            .map(|(name, level, n)| {
                SkillItem::new(*name, *level, (0..*n).map(|i| format!("{name} {i}")).collect())
            })
            .collect();
        Candidate {
            candidate_id: id.to_string(),
            resume: ResumeStruct {
                skills,
                ..Default::default()
            },
        }
    }

    fn strong(id: &str) -> Candidate {
        candidate(
            id,
            &[
                ("react.js", LevelHint::Advanced, 3),
                ("redux", LevelHint::Advanced, 3),
                ("a11y", LevelHint::Advanced, 3),
                ("jest", LevelHint::Advanced, 3),
                ("vite", LevelHint::Advanced, 3),
            ],
        )
    }

    fn params(cutoff: f64, top_k: usize) -> RankingParams {
        RankingParams {
            cutoff,
            top_k,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_params_are_valid() {
        assert_eq!(RankingParams::default().validate(), Ok(()));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let base = RankingParams::default();
        assert_eq!(
            RankingParams { alpha: 1.5, ..base }.validate(),
            Err(ParamsError::Alpha(1.5))
        );
        assert_eq!(
            RankingParams { beta: 0.0, ..base }.validate(),
            Err(ParamsError::Beta(0.0))
        );
        assert_eq!(
            RankingParams { cutoff: -1.0, ..base }.validate(),
            Err(ParamsError::Cutoff(-1.0))
        );
        assert_eq!(RankingParams { top_k: 0, ..base }.validate(), Err(ParamsError::TopK));
    }

    #[test]
    fn test_rank_sorts_descending() {
        let config = Configuration::for_role(Role::Frontend);
        let candidates = vec![
            candidate("weak", &[("react", LevelHint::Beginner, 0)]),
            strong("best"),
            candidate("mid", &[("react", LevelHint::Advanced, 3), ("redux", LevelHint::Intermediate, 1)]),
        ];
        let ranking = rank(&config, "", &candidates, &params(0.0, 10));
        let order: Vec<&str> = ranking.ranked.iter().map(|c| c.candidate_id.as_str()).collect();
        assert_eq!(order, vec!["best", "mid", "weak"]);
        assert_eq!(ranking.ranked[0].rank, 1);
        assert!(ranking.ranked[0].score.hybrid >= ranking.ranked[1].score.hybrid);
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let config = Configuration::for_role(Role::Frontend);
        let candidates = vec![strong("first"), strong("second"), strong("third")];
        let ranking = rank(&config, "", &candidates, &params(0.0, 10));
        let order: Vec<&str> = ranking.ranked.iter().map(|c| c.candidate_id.as_str()).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_shortlist_respects_cutoff_and_top_k() {
        let config = Configuration::for_role(Role::Frontend);
        let candidates = vec![
            strong("a"),
            strong("b"),
            strong("c"),
            candidate("zero", &[]),
        ];
        let ranking = rank(&config, "", &candidates, &params(50.0, 2));
        let shortlisted: Vec<&str> = ranking
            .shortlist
            .iter()
            .map(|c| c.candidate_id.as_str())
            .collect();
        assert_eq!(shortlisted, vec!["a", "b"]);
        let rejected: Vec<&str> = ranking
            .rejected
            .iter()
            .map(|c| c.summary.candidate_id.as_str())
            .collect();
        assert_eq!(rejected, vec!["c", "zero"]);
    }

    #[test]
    fn test_rejected_weakest_dimension() {
        let config = Configuration::for_role(Role::Frontend);
        // only one area covered: L→R low, R→L 100
        let candidates = vec![candidate("narrow", &[("react", LevelHint::Intermediate, 0)])];
        let ranking = rank(&config, "", &candidates, &params(99.0, 5));
        assert!(ranking.shortlist.is_empty());
        assert_eq!(ranking.rejected[0].weakest, Dimension::LeftToRight);

        // nothing matched at all: both 0, tie reports R→L
        let candidates = vec![candidate("empty", &[])];
        let ranking = rank(&config, "", &candidates, &params(99.0, 5));
        assert_eq!(ranking.rejected[0].weakest, Dimension::RightToLeft);
    }

    #[test]
    fn test_dimension_serializes_with_arrows() {
        assert_eq!(
            serde_json::to_string(&Dimension::LeftToRight).unwrap(),
            "\"L→R\""
        );
    }

    #[test]
    fn test_empty_candidate_list() {
        let config = Configuration::for_role(Role::Product);
        let ranking = rank(&config, "", &[], &RankingParams::default());
        assert!(ranking.ranked.is_empty());
        assert!(ranking.shortlist.is_empty());
        assert!(ranking.rejected.is_empty());
    }
}
