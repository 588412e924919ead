//! Model-backed resume structuring with keyword fallback.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::extraction::prompts::{RESUME_PARSE_PROMPT_TEMPLATE, RESUME_PARSE_ROLE};
use crate::extraction::{KeywordStructurer, ResumeStructurer};
use crate::llm_client::prompts::{json_system, MAX_PROMPT_INPUT_CHARS};
use crate::llm_client::{truncate_chars, LlmClient};
use crate::models::resume::{
    EducationEntry, EmploymentEntry, Identity, LevelHint, ResumeStruct, SkillItem,
};
use crate::scoring::canonicalizer::Canonicalizer;
use crate::scoring::jd_config::Configuration;

/// Texts shorter than this (non-whitespace, trimmed) skip the model.
const MIN_TEXT_CHARS: usize = 50;

// ─── Model reply shape ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ParsedResume {
    #[serde(default)]
    identity: Option<Identity>,
    #[serde(default)]
    roles: Vec<EmploymentEntry>,
    #[serde(default)]
    skills: Vec<ParsedSkill>,
    #[serde(default)]
    education: Vec<EducationEntry>,
}

#[derive(Debug, Deserialize)]
struct ParsedSkill {
    #[serde(default)]
    name: String,
    #[serde(default)]
    level_hint: Option<String>,
    #[serde(default, deserialize_with = "crate::models::resume::lenient_text")]
    last_used: Option<String>,
    /// Number or numeric string; anything else is dropped.
    #[serde(default)]
    years_hint: Option<Value>,
    #[serde(default)]
    evidence_snippets: Option<Vec<String>>,
}

fn years_from(value: Option<Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Converts the model reply into a `ResumeStruct`, canonicalizing skill names.
fn into_resume(parsed: ParsedResume, raw_text: &str, canon: &Canonicalizer) -> ResumeStruct {
    let skills = parsed
        .skills
        .into_iter()
        .filter(|s| !s.name.trim().is_empty())
        .map(|s| {
            SkillItem::new(
                canon.canon(&s.name),
                LevelHint::from_hint(s.level_hint.as_deref().unwrap_or_default()),
                s.evidence_snippets.unwrap_or_default(),
            )
            .with_history(s.last_used, years_from(s.years_hint))
        })
        .collect();

    let mut identity = parsed.identity.unwrap_or_default();
    if identity.names.is_empty() {
        identity.names = Identity::unknown().names;
    }

    ResumeStruct {
        identity,
        roles: parsed.roles,
        skills,
        tools: vec![],
        education: parsed.education,
        raw_text: raw_text.to_string(),
    }
}

// ─── Structurer ─────────────────────────────────────────────────────────────

pub struct LlmStructurer {
    llm: LlmClient,
    fallback: KeywordStructurer,
}

impl LlmStructurer {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            fallback: KeywordStructurer,
        }
    }
}

#[async_trait]
impl ResumeStructurer for LlmStructurer {
    async fn structure(
        &self,
        raw_text: &str,
        config: &Configuration,
        canon: &Canonicalizer,
    ) -> ResumeStruct {
        if raw_text.trim().chars().count() < MIN_TEXT_CHARS {
            debug!("resume text too short for model structuring; using keyword scan");
            return self.fallback.scan(raw_text, config, canon);
        }

        let prompt = RESUME_PARSE_PROMPT_TEMPLATE.replace(
            "{resume_text}",
            truncate_chars(raw_text, MAX_PROMPT_INPUT_CHARS),
        );
        let system = json_system(RESUME_PARSE_ROLE);

        match self.llm.call_json::<ParsedResume>(&prompt, &system, 0.0).await {
            Ok(parsed) => {
                let resume = into_resume(parsed, raw_text, canon);
                debug!(skills = resume.skills.len(), "resume structured by model");
                resume
            }
            Err(e) => {
                warn!(error = %e, "model resume structuring failed; using keyword scan");
                self.fallback.scan(raw_text, config, canon)
            }
        }
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}
