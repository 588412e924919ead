//! Resume extraction: raw resume text to a canonicalized `ResumeStruct`.
//!
//! Two backends implement `ResumeStructurer`:
//! - `KeywordStructurer`: deterministic taxonomy scan, always succeeds.
//! - `LlmStructurer`: model-backed; on any failure it logs a warning and
//!   returns the keyword result instead.
//!
//! `AppState` holds an `Arc<dyn ResumeStructurer>` chosen at startup.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::llm_client::LlmClient;
use crate::models::resume::ResumeStruct;
use crate::scoring::canonicalizer::Canonicalizer;
use crate::scoring::jd_config::Configuration;

pub mod handlers;
pub mod keyword;
pub mod llm;
pub mod prompts;
pub mod text;

pub use keyword::KeywordStructurer;
pub use llm::LlmStructurer;

/// Produces a `ResumeStruct` whose skill names are canonical and whose
/// evidence snippets are capped. Implementations never fail.
#[async_trait]
pub trait ResumeStructurer: Send + Sync {
    async fn structure(
        &self,
        raw_text: &str,
        config: &Configuration,
        canon: &Canonicalizer,
    ) -> ResumeStruct;

    /// Label reported alongside results ("keyword" | "llm").
    fn backend(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorBackend {
    Llm,
    Keyword,
}

impl FromStr for ExtractorBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "llm" => Ok(ExtractorBackend::Llm),
            "keyword" | "regex" => Ok(ExtractorBackend::Keyword),
            other => Err(format!("unknown extractor backend '{other}' (expected llm or keyword)")),
        }
    }
}

/// Builds the configured structurer. `Llm` without a client degrades to keyword.
pub fn build_structurer(
    backend: ExtractorBackend,
    llm: Option<LlmClient>,
) -> Arc<dyn ResumeStructurer> {
    match (backend, llm) {
        (ExtractorBackend::Llm, Some(client)) => Arc::new(LlmStructurer::new(client)),
        (ExtractorBackend::Llm, None) => {
            warn!("EXTRACTOR_BACKEND=llm but no ANTHROPIC_API_KEY set; using keyword extraction");
            Arc::new(KeywordStructurer)
        }
        (ExtractorBackend::Keyword, _) => Arc::new(KeywordStructurer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parse() {
        assert_eq!("LLM".parse::<ExtractorBackend>().unwrap(), ExtractorBackend::Llm);
        assert_eq!(
            "keyword".parse::<ExtractorBackend>().unwrap(),
            ExtractorBackend::Keyword
        );
        assert!("magic".parse::<ExtractorBackend>().is_err());
    }

    #[test]
    fn test_llm_backend_without_client_degrades() {
        let structurer = build_structurer(ExtractorBackend::Llm, None);
        assert_eq!(structurer.backend(), "keyword");
    }

    #[test]
    fn test_llm_backend_with_client() {
        let client = LlmClient::new("test-key".to_string());
        let structurer = build_structurer(ExtractorBackend::Llm, Some(client));
        assert_eq!(structurer.backend(), "llm");
    }
}
