use serde::{Deserialize, Deserializer, Serialize};

/// Maximum number of evidence excerpts kept per skill.
pub const MAX_EVIDENCE_SNIPPETS: usize = 3;

/// Self-reported or inferred proficiency level of a skill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelHint {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl LevelHint {
    /// Lenient parse: anything unrecognized counts as intermediate.
    pub fn from_hint(hint: &str) -> Self {
        match hint.trim().to_lowercase().as_str() {
            "beginner" => LevelHint::Beginner,
            "advanced" => LevelHint::Advanced,
            _ => LevelHint::Intermediate,
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            LevelHint::Beginner => 0.3,
            LevelHint::Intermediate => 0.6,
            LevelHint::Advanced => 1.0,
        }
    }
}

impl<'de> Deserialize<'de> for LevelHint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(LevelHint::from_hint).unwrap_or_default())
    }
}

/// A single extracted skill with its proficiency evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillItem {
    /// Canonical token (already passed through the canonicalizer).
    pub name: String,
    #[serde(default)]
    pub level_hint: LevelHint,
    #[serde(default, deserialize_with = "lenient_text")]
    pub last_used: Option<String>,
    #[serde(default)]
    pub years_hint: Option<f64>,
    #[serde(default, deserialize_with = "capped_snippets")]
    evidence_snippets: Vec<String>,
}

impl SkillItem {
    /// Builds a skill, keeping at most [`MAX_EVIDENCE_SNIPPETS`] excerpts.
    pub fn new(name: impl Into<String>, level_hint: LevelHint, mut snippets: Vec<String>) -> Self {
        snippets.truncate(MAX_EVIDENCE_SNIPPETS);
        Self {
            name: name.into(),
            level_hint,
            last_used: None,
            years_hint: None,
            evidence_snippets: snippets,
        }
    }

    pub fn with_history(mut self, last_used: Option<String>, years_hint: Option<f64>) -> Self {
        self.last_used = last_used;
        self.years_hint = years_hint;
        self
    }

    pub fn evidence_snippets(&self) -> &[String] {
        &self.evidence_snippets
    }
}

fn capped_snippets<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let mut snippets = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    snippets.truncate(MAX_EVIDENCE_SNIPPETS);
    Ok(snippets)
}

/// A scalar the model may send as text or as a bare number (`"2019"` / `2019`).
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

/// Optional text that tolerates numbers; blank text becomes `None`.
pub(crate) fn lenient_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let text = match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Text(s)) => s.trim().to_string(),
        Some(Scalar::Number(n)) => n.to_string(),
        None => return Ok(None),
    };
    Ok((!text.is_empty()).then_some(text))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Accepts a single string or a list; blank entries are dropped.
fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let values = match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
        None => vec![],
    };
    Ok(values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default, alias = "name", deserialize_with = "one_or_many")]
    pub names: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub emails: Vec<String>,
}

impl Identity {
    pub fn unknown() -> Self {
        Self {
            names: vec!["Unknown".to_string()],
            emails: vec![],
        }
    }
}

/// One position in the candidate's employment history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmploymentEntry {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub start: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub end: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default, deserialize_with = "lenient_text")]
    pub degree: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub institution: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub year: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolEntry {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub context: Option<String>,
}

/// Structured view of one resume. Built once per candidate, read-only afterwards.
///
/// Skill names are canonical but not deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeStruct {
    #[serde(default)]
    pub identity: Identity,
    #[serde(default)]
    pub roles: Vec<EmploymentEntry>,
    #[serde(default)]
    pub skills: Vec<SkillItem>,
    #[serde(default)]
    pub tools: Vec<ToolEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub raw_text: String,
}
