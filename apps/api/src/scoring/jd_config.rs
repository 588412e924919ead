//! JD Config: per-JD scoring configuration derived from free text.
//!
//! Flow: infer_role → area_hit_counts → normalize_weights (blend with role
//! defaults) → focus_taxonomy → expand_aliases_from_jd → `Configuration`.
//!
//! A `Configuration` is built once per JD evaluation and then only borrowed.
//! Nothing here keeps a "current" configuration around.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::taxonomy::{self, Role, RoleChoice, BASE_ALIASES};

/// Weight given to JD keyword frequency when blending with role defaults.
pub const DEFAULT_BLEND: f64 = 0.6;
/// Minimum keywords kept per area when focusing the taxonomy on a JD.
pub const DEFAULT_KEEP_AT_LEAST: usize = 2;

static JD_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-z0-9.+#/\-]+").expect("JD token pattern is valid")
});

/// Area name → weight. Sums to 1 for the active role.
pub type AreaWeights = BTreeMap<String, f64>;
/// Canonical term → sorted, lowercase aliases.
pub type AliasMap = BTreeMap<String, Vec<String>>;

/// A skill area as seen by one configuration (possibly focused on a JD).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Area {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Derived scoring configuration for one JD evaluation. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct Configuration {
    role: Role,
    area_weights: AreaWeights,
    taxonomy: Vec<Area>,
    aliases: AliasMap,
}

impl Configuration {
    /// Derives role, weights, focused taxonomy and aliases from a JD.
    pub fn from_jd(jd_text: &str) -> Self {
        let role = infer_role(jd_text);
        let profile = taxonomy::profile(role);
        let full = full_taxonomy(role);

        let counts = area_hit_counts(jd_text, &full);
        let area_weights = normalize_weights(&counts, &default_weights(role), DEFAULT_BLEND);
        let taxonomy = focus_taxonomy(jd_text, &full, DEFAULT_KEEP_AT_LEAST);
        let aliases = expand_aliases_from_jd(jd_text, &base_aliases());

        debug!(
            role = %role,
            areas = profile.areas.len(),
            aliases = aliases.len(),
            "derived configuration from JD"
        );

        Self {
            role,
            area_weights,
            taxonomy,
            aliases,
        }
    }

    /// Fixed-role configuration: default weights, full taxonomy, base aliases.
    pub fn for_role(role: Role) -> Self {
        Self {
            role,
            area_weights: default_weights(role),
            taxonomy: full_taxonomy(role),
            aliases: base_aliases(),
        }
    }

    pub fn from_choice(choice: RoleChoice, jd_text: &str) -> Self {
        match choice {
            RoleChoice::Auto => Self::from_jd(jd_text),
            RoleChoice::Fixed(role) => Self::for_role(role),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn area_weights(&self) -> &AreaWeights {
        &self.area_weights
    }

    pub fn taxonomy(&self) -> &[Area] {
        &self.taxonomy
    }

    pub fn aliases(&self) -> &AliasMap {
        &self.aliases
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Derivation steps
// ────────────────────────────────────────────────────────────────────────────

/// Picks the role whose hint phrases occur most often in the JD.
///
/// Ties go to the earlier role in [`Role::ALL`]; a JD with no hints at all
/// maps to [`Role::DEFAULT`].
pub fn infer_role(jd_text: &str) -> Role {
    let text = jd_text.to_lowercase();
    let mut best = Role::DEFAULT;
    let mut best_score = 0usize;

    for role in Role::ALL {
        let score: usize = taxonomy::profile(role)
            .hints
            .iter()
            .map(|hint| text.matches(*hint).count())
            .sum();
        if score > best_score {
            best = role;
            best_score = score;
        }
    }
    best
}

/// Per-area count of literal keyword occurrences in the lowercase JD.
pub fn area_hit_counts(jd_text: &str, areas: &[Area]) -> BTreeMap<String, usize> {
    let text = jd_text.to_lowercase();
    areas
        .iter()
        .map(|area| {
            let hits = area
                .keywords
                .iter()
                .map(|kw| text.matches(kw.to_lowercase().as_str()).count())
                .sum();
            (area.name.clone(), hits)
        })
        .collect()
}

/// Blends JD hit frequencies into the default weights and renormalizes.
///
/// Empty or all-zero counts return the defaults unchanged. Areas absent from
/// `defaults` are ignored.
pub fn normalize_weights(
    counts: &BTreeMap<String, usize>,
    defaults: &AreaWeights,
    blend: f64,
) -> AreaWeights {
    let total_hits: usize = counts.values().sum();
    if total_hits == 0 {
        return defaults.clone();
    }

    let mixed: AreaWeights = defaults
        .iter()
        .map(|(area, default)| {
            let freq = counts.get(area).copied().unwrap_or(0) as f64 / total_hits as f64;
            (area.clone(), blend * freq + (1.0 - blend) * default)
        })
        .collect();

    let sum: f64 = mixed.values().sum();
    let sum = if sum == 0.0 { 1.0 } else { sum };
    mixed.into_iter().map(|(area, w)| (area, w / sum)).collect()
}

/// Lowercase JD tokens in text order: alphanumerics plus `.+#/-`.
fn jd_tokens(jd_text: &str) -> Vec<String> {
    let lower = jd_text.to_lowercase();
    JD_TOKEN
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Seeds from `base` and adds JD-detected surface forms for well-known terms.
pub fn expand_aliases_from_jd(jd_text: &str, base: &AliasMap) -> AliasMap {
    let ordered = jd_tokens(jd_text);
    let tokens: BTreeSet<&str> = ordered.iter().map(String::as_str).collect();
    let has = |t: &str| tokens.contains(t);
    let has_any = |ts: &[&str]| ts.iter().any(|t| has(*t));

    let mut aliases: HashMap<String, Vec<String>> = base
        .iter()
        .map(|(canon, list)| (canon.to_lowercase(), list.clone()))
        .collect();

    let mut add = |canon: &str, forms: &[&str]| {
        let entry = aliases.entry(canon.to_string()).or_default();
        entry.extend(forms.iter().map(|f| f.to_string()));
    };

    if has_any(&["node.js", "nodejs", "node"]) {
        add("node", &["node.js", "nodejs", "node"]);
    }
    if has_any(&["go", "golang"]) {
        add("golang", &["go", "golang"]);
    }
    if has_any(&["postgres", "postgresql"]) {
        add("postgresql", &["postgres", "postgresql"]);
    }
    if has_any(&["react", "reactjs", "react.js"]) {
        add("react.js", &["react", "reactjs"]);
    }
    if has_any(&["next", "nextjs", "next.js"]) {
        add("next.js", &["next", "nextjs"]);
    }
    if has_any(&["ci", "cd", "cicd", "ci/cd"]) {
        add(
            "ci/cd",
            &["ci", "cd", "cicd", "continuous integration", "continuous delivery"],
        );
    }
    if has_any(&["accessibility", "a11y"]) {
        add("a11y", &["accessibility", "a11y"]);
    }
    let joined = ordered.join(" ");
    if has_any(&["wcag", "wcag2"]) || joined.contains("wcag 2.1") {
        add("wcag", &["wcag", "wcag 2.1", "wcag2"]);
    }
    if has_any(&["aria", "aria-label"]) {
        add("aria", &["aria", "aria-label", "aria roles"]);
    }
    if has("web") && has("vitals") {
        add("web vitals", &["web vitals", "core web vitals", "web-vitals"]);
    }

    aliases
        .into_iter()
        .map(|(canon, list)| {
            let cleaned: BTreeSet<String> = list
                .iter()
                .filter(|a| !a.trim().is_empty())
                .map(|a| a.to_lowercase())
                .collect();
            (canon, cleaned.into_iter().collect())
        })
        .collect()
}

/// Keeps the keywords of each area that appear in the JD, padding to
/// `keep_at_least` with absent keywords in the area's original order.
pub fn focus_taxonomy(jd_text: &str, areas: &[Area], keep_at_least: usize) -> Vec<Area> {
    let text = jd_text.to_lowercase();
    areas
        .iter()
        .map(|area| {
            let present: Vec<bool> = area
                .keywords
                .iter()
                .map(|kw| text.contains(kw.to_lowercase().as_str()))
                .collect();
            let mut missing = keep_at_least.saturating_sub(present.iter().filter(|p| **p).count());

            let keywords = area
                .keywords
                .iter()
                .zip(&present)
                .filter(|(_, hit)| {
                    if **hit {
                        true
                    } else if missing > 0 {
                        missing -= 1;
                        true
                    } else {
                        false
                    }
                })
                .map(|(kw, _)| kw.clone())
                .collect();

            Area {
                name: area.name.clone(),
                keywords,
            }
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Static table adapters
// ────────────────────────────────────────────────────────────────────────────

pub fn default_weights(role: Role) -> AreaWeights {
    taxonomy::profile(role)
        .areas
        .iter()
        .map(|a| (a.name.to_string(), a.weight))
        .collect()
}

/// The role's unfocused taxonomy as owned areas.
pub fn full_taxonomy(role: Role) -> Vec<Area> {
    taxonomy::profile(role)
        .areas
        .iter()
        .map(|a| Area {
            name: a.name.to_string(),
            keywords: a.keywords.iter().map(|k| k.to_string()).collect(),
        })
        .collect()
}

pub fn base_aliases() -> AliasMap {
    BASE_ALIASES
        .iter()
        .map(|(canon, forms)| {
            let forms: BTreeSet<String> = forms.iter().map(|f| f.to_lowercase()).collect();
            (canon.to_lowercase(), forms.into_iter().collect())
        })
        .collect()
}
