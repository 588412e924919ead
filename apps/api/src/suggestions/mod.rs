//! JD suggestions: proposes a handful of roles with short job descriptions
//! from uploaded resume texts. Advisory only; never feeds scoring directly.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::llm_client::prompts::{json_system, MAX_PROMPT_INPUT_CHARS};
use crate::llm_client::{truncate_chars, LlmClient};

pub mod handlers;
pub mod prompts;

use prompts::{JD_SUGGEST_PROMPT_TEMPLATE, JD_SUGGEST_ROLE};

const RESUME_SEPARATOR: &str = "\n\n---\n\n";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JdSuggestion {
    pub role: String,
    pub jd: String,
}

#[derive(Debug, Deserialize)]
struct RawSuggestion {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    jd: Option<String>,
}

/// Joins resume texts and caps the result at the prompt input limit.
fn combine_resumes(resume_texts: &[String]) -> String {
    let joined = resume_texts.join(RESUME_SEPARATOR);
    truncate_chars(&joined, MAX_PROMPT_INPUT_CHARS).to_string()
}

/// Trims entries and drops those with a blank role or JD.
fn clean(raw: Vec<RawSuggestion>) -> Vec<JdSuggestion> {
    raw.into_iter()
        .filter_map(|s| {
            let role = s.role.unwrap_or_default().trim().to_string();
            let jd = s.jd.unwrap_or_default().trim().to_string();
            (!role.is_empty() && !jd.is_empty()).then_some(JdSuggestion { role, jd })
        })
        .collect()
}

/// Asks the model for role/JD suggestions. Returns an empty list when no
/// client is configured, no texts were given, or the call fails.
pub async fn suggest_jds(llm: Option<&LlmClient>, resume_texts: &[String]) -> Vec<JdSuggestion> {
    let Some(llm) = llm else {
        return vec![];
    };
    if resume_texts.iter().all(|t| t.trim().is_empty()) {
        return vec![];
    }

    let prompt = JD_SUGGEST_PROMPT_TEMPLATE.replace("{resumes}", &combine_resumes(resume_texts));
    let system = json_system(JD_SUGGEST_ROLE);

    match llm.call_json::<Vec<RawSuggestion>>(&prompt, &system, 0.3).await {
        Ok(raw) => {
            let suggestions = clean(raw);
            info!(count = suggestions.len(), "JD suggestions generated");
            suggestions
        }
        Err(e) => {
            warn!(error = %e, "JD suggestion failed");
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::parse_json_reply;

    #[test]
    fn test_clean_drops_blank_entries() {
        let raw: Vec<RawSuggestion> = parse_json_reply(
            r#"[
                {"role": " Frontend Engineer ", "jd": "Build React UIs."},
                {"role": "", "jd": "No role"},
                {"role": "Backend Engineer"},
                {"role": "Data Scientist", "jd": "   "},
                {"jd": "orphan"}
            ]"#,
        )
        .unwrap();
        let cleaned = clean(raw);
        assert_eq!(
            cleaned,
            vec![JdSuggestion {
                role: "Frontend Engineer".to_string(),
                jd: "Build React UIs.".to_string(),
            }]
        );
    }

    #[test]
    fn test_combine_resumes_joins_and_truncates() {
        let texts = vec!["first".to_string(), "second".to_string()];
        assert_eq!(combine_resumes(&texts), "first\n\n---\n\nsecond");

        let long = vec!["x".repeat(MAX_PROMPT_INPUT_CHARS + 100)];
        assert_eq!(combine_resumes(&long).chars().count(), MAX_PROMPT_INPUT_CHARS);
    }

    #[tokio::test]
    async fn test_no_client_yields_nothing() {
        let texts = vec!["React developer".to_string()];
        assert!(suggest_jds(None, &texts).await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_call_yields_nothing() {
        let client = LlmClient::with_endpoint(
            "test-key".to_string(),
            "http://127.0.0.1:9/v1/messages".to_string(),
            1,
        );
        let texts = vec!["React developer".to_string()];
        assert!(suggest_jds(Some(&client), &texts).await.is_empty());
        assert!(suggest_jds(Some(&client), &[]).await.is_empty());
    }
}
