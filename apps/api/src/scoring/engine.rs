//! Scoring Engine: demand / supply / coverage and the hybrid score.
//!
//! Every entry point takes the `Configuration` explicitly; the engine holds no
//! state and does no I/O, so candidates can be scored from any thread.
//!
//! hybrid = round2(((1 − α)·technical + α·Fβ(L→R, R→L)) · negation_penalty)

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::models::resume::{ResumeStruct, SkillItem, MAX_EVIDENCE_SNIPPETS};
use crate::scoring::jd_config::{AreaWeights, Configuration};
use crate::taxonomy::{self, Role};

/// Guard for every division by theta.
pub const THETA_EPSILON: f64 = 1e-9;

const LEVEL_FACTOR: f64 = 0.4;
const EVIDENCE_FACTOR: f64 = 0.3;
const RECENCY_FACTOR: f64 = 0.3;

const NEGATION_PHRASES: &[&str] = &[
    "no ",
    "not ",
    "without ",
    "lack of ",
    "beginner",
    "basic",
    "exposed to",
    "familiarity with",
];
const NEGATION_STEP: f64 = 0.03;
const NEGATION_FLOOR: f64 = 0.85;

/// Accessibility-heavy frontend JDs get this weight on `perf_a11y`.
const A11Y_OVERRIDE_WEIGHT: f64 = 0.30;
const A11Y_AREA: &str = "perf_a11y";
const A11Y_MIN_MENTIONS: usize = 3;

static A11Y_TERMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(accessibility|wcag|aria|a11y)\b").expect("a11y pattern is valid")
});

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AreaCoverage {
    /// supply / theta, unclamped.
    pub normalized_supply: f64,
    /// min(1, normalized_supply).
    pub coverage: f64,
}

/// Per-area explanation row.
#[derive(Debug, Clone, Serialize)]
pub struct AreaBreakdown {
    pub area: String,
    /// Configuration weight (what `technical` uses).
    pub weight: f64,
    /// Demand weight after the accessibility override (what L→R uses).
    pub demand: f64,
    pub supply: f64,
    pub normalized_supply: f64,
    pub coverage: f64,
}

/// Per-skill explanation row.
#[derive(Debug, Clone, Serialize)]
pub struct SkillEvidence {
    pub name: String,
    pub depth: f64,
    /// Areas of the active taxonomy listing this skill.
    pub areas: Vec<String>,
    pub evidence_snippets: Vec<String>,
}

/// Full scoring result for one candidate.
#[derive(Debug, Clone, Serialize)]
pub struct HybridScore {
    /// Final score in [0, 100], two decimals.
    pub hybrid: f64,
    pub technical: f64,
    pub left_to_right: f64,
    pub right_to_left: f64,
    pub fbeta: f64,
    pub negation_penalty: f64,
    pub areas: Vec<AreaBreakdown>,
    pub skills: Vec<SkillEvidence>,
}

// ────────────────────────────────────────────────────────────────────────────
// Per-skill depth
// ────────────────────────────────────────────────────────────────────────────

/// Recency hook. Always 1.0 until a decay on `last_used` is introduced.
pub fn recency_score(_last_used: Option<&str>) -> f64 {
    1.0
}

pub fn evidence_score(snippet_count: usize) -> f64 {
    (snippet_count as f64 / MAX_EVIDENCE_SNIPPETS as f64).min(1.0)
}

/// Composite proficiency estimate in [0, 1].
pub fn depth(skill: &SkillItem) -> f64 {
    LEVEL_FACTOR * skill.level_hint.weight()
        + EVIDENCE_FACTOR * evidence_score(skill.evidence_snippets().len())
        + RECENCY_FACTOR * recency_score(skill.last_used.as_deref())
}

/// Multiplicative dampener for hedging language, floored at 0.85.
pub fn negation_penalty(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let hits: usize = NEGATION_PHRASES
        .iter()
        .map(|phrase| lower.matches(*phrase).count())
        .sum();
    (1.0 - NEGATION_STEP * hits as f64).max(NEGATION_FLOOR)
}

// ────────────────────────────────────────────────────────────────────────────
// Demand / supply / coverage
// ────────────────────────────────────────────────────────────────────────────

/// Area demand for a JD: the configuration weights, with the frontend
/// accessibility override applied when the JD stresses it.
pub fn demand(config: &Configuration, jd_text: &str) -> AreaWeights {
    let mut weights = config.area_weights().clone();
    if config.role() != Role::Frontend {
        return weights;
    }

    let mentions = A11Y_TERMS.find_iter(&jd_text.to_lowercase()).count();
    if mentions >= A11Y_MIN_MENTIONS {
        weights.insert(A11Y_AREA.to_string(), A11Y_OVERRIDE_WEIGHT);
        let sum: f64 = weights.values().sum();
        let sum = if sum == 0.0 { 1.0 } else { sum };
        for w in weights.values_mut() {
            *w /= sum;
        }
    }
    weights
}

/// keyword → areas of the configuration's (focused) taxonomy.
fn keyword_index(config: &Configuration) -> HashMap<String, Vec<&str>> {
    let mut index: HashMap<String, Vec<&str>> = HashMap::new();
    for area in config.taxonomy() {
        for kw in &area.keywords {
            index.entry(kw.to_lowercase()).or_default().push(area.name.as_str());
        }
    }
    index
}

fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        0.5 * (values[mid - 1] + values[mid])
    }
}

/// Median skill depth per taxonomy area; areas without matches score 0.
pub fn supply(config: &Configuration, resume: &ResumeStruct) -> BTreeMap<String, f64> {
    let index = keyword_index(config);
    let mut buckets: HashMap<&str, Vec<f64>> = HashMap::new();

    for skill in &resume.skills {
        if let Some(areas) = index.get(&skill.name.to_lowercase()) {
            let d = depth(skill);
            for area in areas {
                buckets.entry(*area).or_default().push(d);
            }
        }
    }

    config
        .taxonomy()
        .iter()
        .map(|area| {
            let value = buckets
                .get_mut(area.name.as_str())
                .map(|vals| median(vals))
                .unwrap_or(0.0);
            (area.name.clone(), value)
        })
        .collect()
}

fn area_coverage(role: Role, area: &str, supply: f64) -> AreaCoverage {
    let theta = taxonomy::profile(role).theta(area).max(THETA_EPSILON);
    let normalized_supply = supply / theta;
    AreaCoverage {
        normalized_supply,
        coverage: normalized_supply.min(1.0),
    }
}

fn coverage_from(
    role: Role,
    demand: &AreaWeights,
    supply: &BTreeMap<String, f64>,
) -> BTreeMap<String, AreaCoverage> {
    demand
        .keys()
        .map(|area| {
            let s = supply.get(area).copied().unwrap_or(0.0);
            (area.clone(), area_coverage(role, area, s))
        })
        .collect()
}

/// Coverage per demand area.
pub fn coverage(
    config: &Configuration,
    jd_text: &str,
    resume: &ResumeStruct,
) -> BTreeMap<String, AreaCoverage> {
    coverage_from(
        config.role(),
        &demand(config, jd_text),
        &supply(config, resume),
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Directional scores
// ────────────────────────────────────────────────────────────────────────────

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn weighted_coverage(weights: &AreaWeights, coverage: &BTreeMap<String, AreaCoverage>) -> f64 {
    let sum: f64 = weights
        .iter()
        .map(|(area, w)| w * coverage.get(area).map(|c| c.coverage).unwrap_or(0.0))
        .sum();
    round_to(100.0 * sum, 1)
}

/// L→R (recall-like): how much of the JD demand the resume covers.
pub fn left_to_right(config: &Configuration, jd_text: &str, resume: &ResumeStruct) -> f64 {
    let demand = demand(config, jd_text);
    let coverage = coverage_from(config.role(), &demand, &supply(config, resume));
    weighted_coverage(&demand, &coverage)
}

/// R→L (precision-like): share of the resume's depth that falls inside the
/// role's full, unfocused keyword universe.
///
/// The denominator runs over all skills, including off-taxonomy ones.
pub fn right_to_left(role: Role, resume: &ResumeStruct) -> f64 {
    let universe: HashSet<String> = taxonomy::profile(role)
        .keyword_universe()
        .map(str::to_lowercase)
        .collect();

    let (num, den) = resume.skills.iter().fold((0.0, 0.0), |(num, den), skill| {
        let d = depth(skill);
        if universe.contains(&skill.name.to_lowercase()) {
            (num + d, den + d)
        } else {
            (num, den + d)
        }
    });

    if den == 0.0 {
        return 0.0;
    }
    round_to(100.0 * num / den, 1)
}

/// Coverage weighted by the configuration weights, without the demand override.
pub fn technical(config: &Configuration, resume: &ResumeStruct) -> f64 {
    let weights = config.area_weights();
    let coverage = coverage_from(config.role(), weights, &supply(config, resume));
    weighted_coverage(weights, &coverage)
}

/// F-beta of L→R (recall) and R→L (precision), on the 0–100 scale.
pub fn fbeta(l2r: f64, r2l: f64, beta: f64) -> f64 {
    let recall = l2r / 100.0;
    let precision = r2l / 100.0;
    let beta_sq = beta * beta;
    let denom = beta_sq * recall + precision;
    if denom == 0.0 {
        return 0.0;
    }
    (1.0 + beta_sq) * recall * precision / denom * 100.0
}

/// Final blended score plus the explanation breakdown.
pub fn hybrid(
    config: &Configuration,
    jd_text: &str,
    resume: &ResumeStruct,
    alpha: f64,
    beta: f64,
) -> HybridScore {
    let role = config.role();
    let demand = demand(config, jd_text);
    let supply = supply(config, resume);

    let demand_coverage = coverage_from(role, &demand, &supply);
    let l2r = weighted_coverage(&demand, &demand_coverage);
    let r2l = right_to_left(role, resume);

    let weights = config.area_weights();
    let weight_coverage = coverage_from(role, weights, &supply);
    let tech = weighted_coverage(weights, &weight_coverage);

    let f = fbeta(l2r, r2l, beta);
    let penalty = negation_penalty(&resume.raw_text);
    let raw = (1.0 - alpha) * tech + alpha * f;

    HybridScore {
        hybrid: round_to(raw * penalty, 2),
        technical: tech,
        left_to_right: l2r,
        right_to_left: r2l,
        fbeta: f,
        negation_penalty: penalty,
        areas: area_breakdown(config, &demand, &supply, &demand_coverage),
        skills: skill_evidence(config, resume),
    }
}

fn area_breakdown(
    config: &Configuration,
    demand: &AreaWeights,
    supply: &BTreeMap<String, f64>,
    coverage: &BTreeMap<String, AreaCoverage>,
) -> Vec<AreaBreakdown> {
    config
        .taxonomy()
        .iter()
        .map(|area| {
            let name = area.name.as_str();
            let cov = coverage
                .get(name)
                .copied()
                .unwrap_or(AreaCoverage {
                    normalized_supply: 0.0,
                    coverage: 0.0,
                });
            AreaBreakdown {
                area: area.name.clone(),
                weight: config.area_weights().get(name).copied().unwrap_or(0.0),
                demand: demand.get(name).copied().unwrap_or(0.0),
                supply: supply.get(name).copied().unwrap_or(0.0),
                normalized_supply: cov.normalized_supply,
                coverage: cov.coverage,
            }
        })
        .collect()
}

fn skill_evidence(config: &Configuration, resume: &ResumeStruct) -> Vec<SkillEvidence> {
    let index = keyword_index(config);
    resume
        .skills
        .iter()
        .map(|skill| SkillEvidence {
            name: skill.name.clone(),
            depth: depth(skill),
            areas: index
                .get(&skill.name.to_lowercase())
                .map(|areas| areas.iter().map(|a| a.to_string()).collect())
                .unwrap_or_default(),
            evidence_snippets: skill.evidence_snippets().to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::LevelHint;

    const A11Y_JD: &str = "Frontend role. Accessibility first: WCAG audits, ARIA roles, a11y reviews.";

    fn skill(name: &str, level: LevelHint, evidence: usize) -> SkillItem {
        let snippets = (0..evidence).map(|i| format!("used {name} #{i}")).collect();
        SkillItem::new(name, level, snippets)
    }

    fn resume(skills: Vec<SkillItem>, raw_text: &str) -> ResumeStruct {
        ResumeStruct {
            skills,
            raw_text: raw_text.to_string(),
            ..Default::default()
        }
    }

    fn frontend() -> Configuration {
        Configuration::for_role(Role::Frontend)
    }

    #[test]
    fn test_depth_intermediate_no_evidence() {
        let d = depth(&skill("react", LevelHint::Intermediate, 0));
        assert!((d - 0.54).abs() < 1e-9, "depth was {d}");
    }

    #[test]
    fn test_depth_advanced_full_evidence_is_one() {
        let d = depth(&skill("react", LevelHint::Advanced, 3));
        assert!((d - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_depth_monotone_in_evidence_then_flat() {
        let depths: Vec<f64> = (0..=3)
            .map(|n| depth(&skill("jest", LevelHint::Beginner, n)))
            .collect();
        for pair in depths.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert_eq!(evidence_score(3), evidence_score(7));
        assert_eq!(evidence_score(0), 0.0);
    }

    #[test]
    fn test_negation_penalty_scenario() {
        let p = negation_penalty("I have no production experience, only basic scripting.");
        assert!((p - 0.94).abs() < 1e-9, "penalty was {p}");
    }

    #[test]
    fn test_negation_penalty_floor() {
        let text = "not ".repeat(20);
        assert_eq!(negation_penalty(&text), 0.85);
        assert_eq!(negation_penalty("Shipped React apps."), 1.0);
    }

    #[test]
    fn test_negation_penalty_case_insensitive() {
        assert!((negation_penalty("Familiarity With Rust") - 0.97).abs() < 1e-9);
    }

    #[test]
    fn test_demand_a11y_override_renormalizes() {
        let config = frontend();
        let d = demand(&config, A11Y_JD);
        let sum: f64 = d.values().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        // 0.30 / (1.0 - 0.20 + 0.30)
        assert!((d["perf_a11y"] - 0.30 / 1.10).abs() < 1e-9);
    }

    #[test]
    fn test_demand_a11y_needs_three_whole_words() {
        let config = frontend();
        // "aria" inside "variables" is not a whole word
        let d = demand(&config, "accessibility, wcag and css variables");
        assert_eq!(&d, config.area_weights());
    }

    #[test]
    fn test_demand_override_only_for_frontend() {
        let config = Configuration::for_role(Role::Backend);
        assert_eq!(&demand(&config, A11Y_JD), config.area_weights());
    }

    #[test]
    fn test_supply_median_even_and_odd() {
        let config = frontend();
        let r = resume(
            vec![
                skill("react", LevelHint::Beginner, 0),
                skill("vue", LevelHint::Advanced, 3),
                skill("angular", LevelHint::Intermediate, 0),
                skill("jest", LevelHint::Advanced, 0),
                skill("cypress", LevelHint::Beginner, 0),
            ],
            "",
        );
        let s = supply(&config, &r);
        // frameworks [0.42, 0.54, 1.0], testing [0.42, 0.7]
        assert!((s["frameworks"] - 0.54).abs() < 1e-9);
        assert!((s["testing"] - 0.56).abs() < 1e-9);
        assert_eq!(s["state_mgmt"], 0.0);
    }

    #[test]
    fn test_supply_ignores_off_taxonomy_skills() {
        let config = frontend();
        let r = resume(vec![skill("cobol", LevelHint::Advanced, 3)], "");
        assert!(supply(&config, &r).values().all(|v| *v == 0.0));
    }

    #[test]
    fn test_frameworks_scenario() {
        let config = frontend();
        let r = resume(vec![skill("react", LevelHint::Intermediate, 0)], "");
        let cov = coverage(&config, "", &r);
        let frameworks = cov["frameworks"];
        assert!((frameworks.normalized_supply - 0.54 / 0.65).abs() < 1e-9);
        assert!((frameworks.coverage - 0.8307692).abs() < 1e-6);
        // 0.35 * 0.831 ≈ 0.291 → 29.1 on the 0–100 scale
        assert_eq!(left_to_right(&config, "", &r), 29.1);
        assert_eq!(technical(&config, &r), 29.1);
    }

    #[test]
    fn test_coverage_clamped_to_one() {
        let config = frontend();
        let r = resume(vec![skill("jest", LevelHint::Advanced, 3)], "");
        let cov = coverage(&config, "", &r);
        assert!((cov["testing"].normalized_supply - 2.0).abs() < 1e-9);
        assert_eq!(cov["testing"].coverage, 1.0);
        assert!(cov.values().all(|c| (0.0..=1.0).contains(&c.coverage)));
    }

    #[test]
    fn test_right_to_left_counts_off_taxonomy_in_denominator() {
        let r = resume(
            vec![
                skill("react", LevelHint::Intermediate, 0),
                skill("photoshop", LevelHint::Intermediate, 0),
            ],
            "",
        );
        assert_eq!(right_to_left(Role::Frontend, &r), 50.0);
    }

    #[test]
    fn test_right_to_left_uses_unfocused_universe() {
        // "mobx" is dropped by focusing on this JD, but still counts for R→L
        let config = Configuration::from_jd("React and Redux and Zustand frontend");
        assert!(!config
            .taxonomy()
            .iter()
            .any(|a| a.keywords.iter().any(|k| k == "mobx")));
        let r = resume(vec![skill("mobx", LevelHint::Advanced, 1)], "");
        assert_eq!(right_to_left(config.role(), &r), 100.0);
    }

    #[test]
    fn test_fbeta_edges() {
        assert_eq!(fbeta(0.0, 0.0, 1.5), 0.0);
        for beta in [0.5, 1.0, 1.5, 3.0] {
            assert!((fbeta(100.0, 100.0, beta) - 100.0).abs() < 1e-9);
        }
        assert_eq!(fbeta(0.0, 80.0, 1.5), 0.0);
    }

    #[test]
    fn test_fbeta_f1_is_harmonic_mean() {
        let f = fbeta(50.0, 100.0, 1.0);
        assert!((f - 66.666_666).abs() < 1e-3);
    }

    #[test]
    fn test_zero_skill_resume_scores_zero() {
        let config = Configuration::from_jd(A11Y_JD);
        let r = resume(vec![], "A resume with nothing recognizable.");
        let score = hybrid(&config, A11Y_JD, &r, 0.4, 1.5);
        assert_eq!(score.technical, 0.0);
        assert_eq!(score.left_to_right, 0.0);
        assert_eq!(score.right_to_left, 0.0);
        assert_eq!(score.hybrid, 0.0);
    }

    #[test]
    fn test_hybrid_blend_and_penalty() {
        let config = frontend();
        let r = resume(
            vec![skill("react", LevelHint::Intermediate, 0)],
            "no tests written",
        );
        let score = hybrid(&config, "", &r, 0.4, 1.5);
        // technical 29.1, L→R 29.1, R→L 100
        let f = fbeta(29.1, 100.0, 1.5);
        let expected = ((0.6 * 29.1 + 0.4 * f) * 0.97 * 100.0).round() / 100.0;
        assert!((score.hybrid - expected).abs() < 1e-9);
        assert!((score.negation_penalty - 0.97).abs() < 1e-9);
    }

    #[test]
    fn test_technical_ignores_a11y_demand_override() {
        let config = frontend();
        let r = resume(vec![skill("react", LevelHint::Intermediate, 0)], "");
        let score = hybrid(&config, A11Y_JD, &r, 0.4, 1.5);
        // override lowers the frameworks share of demand to 0.35 / 1.10
        assert!((score.technical - 29.1).abs() < 1e-9);
        assert!((score.left_to_right - 26.4).abs() < 1e-9);
        assert!((technical(&config, &r) - 29.1).abs() < 1e-9);
        assert!((left_to_right(&config, A11Y_JD, &r) - 26.4).abs() < 1e-9);
    }

    #[test]
    fn test_hybrid_scores_stay_in_range() {
        let config = Configuration::from_jd(A11Y_JD);
        let r = resume(
            vec![
                skill("react.js", LevelHint::Advanced, 3),
                skill("redux", LevelHint::Advanced, 3),
                skill("a11y", LevelHint::Advanced, 3),
                skill("wcag", LevelHint::Advanced, 3),
                skill("jest", LevelHint::Advanced, 3),
                skill("webpack", LevelHint::Advanced, 3),
                skill("vite", LevelHint::Advanced, 3),
            ],
            "",
        );
        for alpha in [0.0, 0.4, 1.0] {
            let score = hybrid(&config, A11Y_JD, &r, alpha, 1.5);
            for v in [score.hybrid, score.technical, score.left_to_right, score.right_to_left] {
                assert!((0.0..=100.0).contains(&v), "{v} out of range");
            }
        }
    }

    #[test]
    fn test_hybrid_explanations_follow_taxonomy_order() {
        let config = frontend();
        let r = resume(vec![skill("redux", LevelHint::Advanced, 2)], "");
        let score = hybrid(&config, "", &r, 0.4, 1.5);
        let names: Vec<&str> = score.areas.iter().map(|a| a.area.as_str()).collect();
        assert_eq!(
            names,
            vec!["frameworks", "state_mgmt", "perf_a11y", "testing", "build_deploy"]
        );
        assert_eq!(score.skills[0].areas, vec!["state_mgmt"]);
        assert_eq!(score.skills[0].evidence_snippets.len(), 2);
    }

    #[test]
    fn test_canonical_names_match_taxonomy_keywords() {
        let config = Configuration::for_role(Role::Backend);
        let r = resume(vec![skill("ci/cd", LevelHint::Advanced, 3)], "");
        let s = supply(&config, &r);
        assert!((s["infra_tooling"] - 1.0).abs() < 1e-9);
        assert_eq!(s["cloud"], 0.0);
    }
}
