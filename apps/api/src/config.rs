use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

use crate::extraction::ExtractorBackend;
use crate::scoring::ranker::RankingParams;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Enables model-backed structuring and JD suggestions when set.
    pub anthropic_api_key: Option<String>,
    pub extractor_backend: ExtractorBackend,
    /// Used for any ranking parameter a request leaves out.
    pub ranking_defaults: RankingParams,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup (the process env in production).
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let fallback = RankingParams::default();
        let ranking_defaults = RankingParams {
            alpha: parse_or(&get, "DEFAULT_ALPHA", fallback.alpha)?,
            beta: parse_or(&get, "DEFAULT_BETA", fallback.beta)?,
            cutoff: parse_or(&get, "DEFAULT_CUTOFF", fallback.cutoff)?,
            top_k: parse_or(&get, "DEFAULT_TOP_K", fallback.top_k)?,
        };
        ranking_defaults
            .validate()
            .context("DEFAULT_* ranking parameters are out of range")?;

        Ok(Config {
            anthropic_api_key: non_blank(&get, "ANTHROPIC_API_KEY"),
            extractor_backend: parse_or(&get, "EXTRACTOR_BACKEND", ExtractorBackend::Llm)?,
            ranking_defaults,
            max_upload_bytes: parse_or(&get, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            port: parse_or(&get, "PORT", 8080u16).context("PORT must be a valid port number")?,
            rust_log: non_blank(&get, "RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Keyword-only config with default ranking parameters.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        use std::collections::HashMap;
        Self::from_vars(|key| {
            HashMap::from([("EXTRACTOR_BACKEND", "keyword")])
                .get(key)
                .map(|v| v.to_string())
        })
        .expect("test config is valid")
    }
}

fn non_blank(get: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match non_blank(get, key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow!("invalid value '{raw}' for {key}: {e}")),
        None => Ok(default),
    }
}
