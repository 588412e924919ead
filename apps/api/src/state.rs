use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::extraction::{build_structurer, ResumeStructurer};
use crate::llm_client::{self, LlmClient};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Present only when an API key is configured.
    pub llm: Option<LlmClient>,
    /// Resume structurer chosen at startup. Default: LlmStructurer with keyword fallback.
    pub structurer: Arc<dyn ResumeStructurer>,
}

impl AppState {
    pub fn from_config(config: Config) -> Self {
        let llm = config.anthropic_api_key.clone().map(LlmClient::new);
        match &llm {
            Some(_) => info!("LLM client initialized (model: {})", llm_client::MODEL),
            None => info!("No ANTHROPIC_API_KEY set; LLM features disabled"),
        }

        let structurer = build_structurer(config.extractor_backend, llm.clone());
        info!("Resume structurer: {}", structurer.backend());

        Self {
            config,
            llm,
            structurer,
        }
    }
}
