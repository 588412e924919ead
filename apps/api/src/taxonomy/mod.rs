//! Taxonomy Store: static knowledge base every scoring run starts from.
//!
//! Per role: ordered skill areas (keywords, default weight, theta baseline),
//! role-inference hint phrases, plus one alias table shared by all roles.
//! Everything here is `'static` and read-only; derived per-JD state lives in
//! `scoring::jd_config::Configuration`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Target role. Declaration order is the tie-break order for role inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Frontend,
    Backend,
    DataScience,
    Product,
}

impl Role {
    /// Fixed enumeration order.
    pub const ALL: [Role; 4] = [Role::Frontend, Role::Backend, Role::DataScience, Role::Product];

    /// Role used when a JD carries no hint phrases at all.
    pub const DEFAULT: Role = Role::Frontend;

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Frontend => "frontend",
            Role::Backend => "backend",
            Role::DataScience => "data_science",
            Role::Product => "product",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown role '{0}' (expected auto, frontend, backend, data_science or product)")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == wanted)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Role selection coming from callers: infer from the JD, or pin a role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoleChoice {
    #[default]
    Auto,
    Fixed(Role),
}

impl FromStr for RoleChoice {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() || s.trim().eq_ignore_ascii_case("auto") {
            return Ok(RoleChoice::Auto);
        }
        s.parse().map(RoleChoice::Fixed)
    }
}

/// One skill bucket of a role.
#[derive(Debug)]
pub struct AreaSpec {
    pub name: &'static str,
    /// Canonical keywords in their authoritative order.
    pub keywords: &'static [&'static str],
    /// Default weight; a role's weights sum to 1.
    pub weight: f64,
    /// Expected-proficiency baseline in (0, 1].
    pub theta: f64,
}

#[derive(Debug)]
pub struct RoleProfile {
    pub role: Role,
    pub areas: &'static [AreaSpec],
    pub hints: &'static [&'static str],
}

impl RoleProfile {
    pub fn area(&self, name: &str) -> Option<&'static AreaSpec> {
        self.areas.iter().find(|a| a.name == name)
    }

    /// Theta for an area of this role.
    ///
    /// Panics when the area does not belong to the role: every area that
    /// reaches scoring comes from this same table.
    pub fn theta(&self, area: &str) -> f64 {
        match self.area(area) {
            Some(spec) => spec.theta,
            None => panic!("area '{area}' is not defined for role '{}'", self.role),
        }
    }

    /// Every keyword across all areas, unfocused.
    pub fn keyword_universe(&self) -> impl Iterator<Item = &'static str> {
        self.areas.iter().flat_map(|a| a.keywords.iter().copied())
    }
}

/// Returns the static profile for a role.
pub fn profile(role: Role) -> &'static RoleProfile {
    match role {
        Role::Frontend => &FRONTEND,
        Role::Backend => &BACKEND,
        Role::DataScience => &DATA_SCIENCE,
        Role::Product => &PRODUCT,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Role tables
// ────────────────────────────────────────────────────────────────────────────

static FRONTEND: RoleProfile = RoleProfile {
    role: Role::Frontend,
    areas: &[
        AreaSpec {
            name: "frameworks",
            keywords: &["react", "react.js", "reactjs", "next.js", "nextjs", "vue", "angular"],
            weight: 0.35,
            theta: 0.65,
        },
        AreaSpec {
            name: "state_mgmt",
            keywords: &["redux", "zustand", "mobx", "context api"],
            weight: 0.20,
            theta: 0.60,
        },
        AreaSpec {
            name: "perf_a11y",
            keywords: &["lighthouse", "web vitals", "a11y", "accessibility", "wcag", "aria"],
            weight: 0.20,
            theta: 0.60,
        },
        AreaSpec {
            name: "testing",
            keywords: &["jest", "cypress", "rtl", "testing library", "playwright"],
            weight: 0.15,
            theta: 0.50,
        },
        AreaSpec {
            name: "build_deploy",
            keywords: &["webpack", "vite", "vercel", "netlify", "ci/cd", "cicd"],
            weight: 0.10,
            theta: 0.50,
        },
    ],
    hints: &[
        "frontend",
        "front-end",
        "ui engineer",
        "web developer",
        "react",
        "next.js",
        "vue",
        "angular",
        "redux",
        "a11y",
        "wcag",
        "aria",
        "lighthouse",
    ],
};

static BACKEND: RoleProfile = RoleProfile {
    role: Role::Backend,
    areas: &[
        AreaSpec {
            name: "databases",
            keywords: &[
                "postgres",
                "postgresql",
                "mysql",
                "mariadb",
                "mongodb",
                "redis",
                "cassandra",
                "dynamodb",
                "snowflake",
            ],
            weight: 0.25,
            theta: 0.60,
        },
        AreaSpec {
            name: "backend_langs",
            keywords: &[
                "python", "fastapi", "django", "flask", "java", "spring", "go", "golang", "node",
                "express", "kotlin", "scala",
            ],
            weight: 0.25,
            theta: 0.65,
        },
        AreaSpec {
            name: "cloud",
            keywords: &["aws", "gcp", "azure", "ecs", "eks", "gke", "lambda", "cloud run"],
            weight: 0.20,
            theta: 0.55,
        },
        AreaSpec {
            name: "infra_tooling",
            keywords: &[
                "docker",
                "kubernetes",
                "terraform",
                "ansible",
                "github actions",
                "argo",
                "ci/cd",
                "cicd",
            ],
            weight: 0.15,
            theta: 0.50,
        },
        AreaSpec {
            name: "testing",
            keywords: &[
                "unit test",
                "pytest",
                "junit",
                "integration test",
                "e2e",
                "end to end",
            ],
            weight: 0.10,
            theta: 0.45,
        },
        AreaSpec {
            name: "observability",
            keywords: &[
                "prometheus",
                "grafana",
                "datadog",
                "sentry",
                "otel",
                "opentelemetry",
                "logs",
                "traces",
                "metrics",
            ],
            weight: 0.05,
            theta: 0.40,
        },
    ],
    hints: &[
        "backend",
        "back-end",
        "api",
        "microservices",
        "java",
        "spring",
        "python",
        "django",
        "fastapi",
        "go",
        "golang",
        "node",
        "postgres",
        "mysql",
        "redis",
        "kubernetes",
        "docker",
    ],
};

static DATA_SCIENCE: RoleProfile = RoleProfile {
    role: Role::DataScience,
    areas: &[
        AreaSpec {
            name: "python_ds",
            keywords: &["python", "pandas", "numpy", "scikit", "sklearn", "matplotlib"],
            weight: 0.25,
            theta: 0.60,
        },
        AreaSpec {
            name: "ml",
            keywords: &["xgboost", "lightgbm", "pytorch", "tensorflow", "nlp", "cv", "transformer"],
            weight: 0.25,
            theta: 0.60,
        },
        AreaSpec {
            name: "data_eng",
            keywords: &["sql", "spark", "airflow", "dbt", "kafka"],
            weight: 0.20,
            theta: 0.55,
        },
        AreaSpec {
            name: "experimentation",
            keywords: &["ab test", "a/b", "experiment", "causal"],
            weight: 0.15,
            theta: 0.45,
        },
        AreaSpec {
            name: "viz_comm",
            keywords: &["tableau", "powerbi", "plotly", "deck"],
            weight: 0.10,
            theta: 0.45,
        },
        AreaSpec {
            name: "cloud",
            keywords: &["aws", "gcp", "sagemaker", "databricks"],
            weight: 0.05,
            theta: 0.40,
        },
    ],
    hints: &[
        "data scientist",
        "data science",
        "ml",
        "machine learning",
        "modeling",
        "pytorch",
        "tensorflow",
        "xgboost",
        "pandas",
        "sql",
        "experiment",
        "ab test",
        "causal",
    ],
};

static PRODUCT: RoleProfile = RoleProfile {
    role: Role::Product,
    areas: &[
        AreaSpec {
            name: "discovery",
            keywords: &["user research", "interview", "insights"],
            weight: 0.25,
            theta: 0.60,
        },
        AreaSpec {
            name: "delivery",
            keywords: &["roadmap", "backlog", "agile", "scrum"],
            weight: 0.25,
            theta: 0.60,
        },
        AreaSpec {
            name: "analytics",
            keywords: &["sql", "amplitude", "mixpanel", "ga4"],
            weight: 0.20,
            theta: 0.55,
        },
        AreaSpec {
            name: "tech_fluency",
            keywords: &["api", "architecture", "aws", "gcp"],
            weight: 0.15,
            theta: 0.50,
        },
        AreaSpec {
            name: "stakeholders",
            keywords: &["communication", "collaboration", "alignment"],
            weight: 0.15,
            theta: 0.55,
        },
    ],
    hints: &[
        "product manager",
        "product management",
        "discovery",
        "roadmap",
        "backlog",
        "stakeholder",
        "analytics",
        "mixpanel",
        "amplitude",
    ],
};

/// Base alias table: canonical term → surface forms.
pub const BASE_ALIASES: &[(&str, &[&str])] = &[
    ("react.js", &["react", "reactjs"]),
    ("next.js", &["next", "nextjs"]),
    (
        "ci/cd",
        &["cicd", "continuous integration", "continuous delivery", "ci", "cd"],
    ),
    ("web vitals", &["core web vitals", "web-vitals"]),
    ("testing library", &["@testing-library", "rtl"]),
    ("a11y", &["accessibility"]),
    ("wcag", &["wcag2", "wcag 2.1"]),
    ("aria", &["aria-label", "aria roles"]),
    ("node", &["nodejs", "node.js"]),
    ("golang", &["go"]),
    ("postgresql", &["postgres"]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one_for_every_role() {
        for role in Role::ALL {
            let sum: f64 = profile(role).areas.iter().map(|a| a.weight).sum();
            assert!((sum - 1.0).abs() < 1e-6, "{role} weights sum to {sum}");
        }
    }

    #[test]
    fn test_theta_in_unit_interval() {
        for role in Role::ALL {
            for area in profile(role).areas {
                assert!(area.theta > 0.0 && area.theta <= 1.0, "{}", area.name);
            }
        }
    }

    #[test]
    fn test_role_parse_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert_eq!("Data_Science".parse::<Role>().unwrap(), Role::DataScience);
        assert!("designer".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_choice_auto_and_fixed() {
        assert_eq!("auto".parse::<RoleChoice>().unwrap(), RoleChoice::Auto);
        assert_eq!("".parse::<RoleChoice>().unwrap(), RoleChoice::Auto);
        assert_eq!(
            "backend".parse::<RoleChoice>().unwrap(),
            RoleChoice::Fixed(Role::Backend)
        );
    }

    #[test]
    fn test_role_serde_is_snake_case() {
        let json = serde_json::to_string(&Role::DataScience).unwrap();
        assert_eq!(json, "\"data_science\"");
    }

    #[test]
    #[should_panic(expected = "not defined for role")]
    fn test_theta_unknown_area_panics() {
        profile(Role::Frontend).theta("databases");
    }
}
