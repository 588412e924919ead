//! Deterministic resume structuring: literal scan for taxonomy keywords.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::extraction::ResumeStructurer;
use crate::models::resume::{Identity, LevelHint, ResumeStruct, SkillItem, MAX_EVIDENCE_SNIPPETS};
use crate::scoring::canonicalizer::Canonicalizer;
use crate::scoring::jd_config::Configuration;

/// Characters of context kept on each side of a keyword hit.
const SNIPPET_RADIUS: usize = 50;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").expect("email pattern is valid")
});

/// Keyword-scan structurer. Pure and infallible.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordStructurer;

impl KeywordStructurer {
    /// Scans `raw_text` for every keyword of the configuration's taxonomy.
    ///
    /// Hits are canonicalized and deduplicated by canonical name; each skill
    /// is `intermediate` with up to three context snippets.
    pub fn scan(&self, raw_text: &str, config: &Configuration, canon: &Canonicalizer) -> ResumeStruct {
        let lowered = raw_text.to_lowercase();
        let keywords: BTreeSet<String> = config
            .taxonomy()
            .iter()
            .flat_map(|area| area.keywords.iter().map(|k| k.to_lowercase()))
            .collect();

        let mut seen = HashSet::new();
        let mut skills = Vec::new();
        for keyword in &keywords {
            if !lowered.contains(keyword.as_str()) {
                continue;
            }
            let name = canon.canon(keyword);
            if seen.insert(name.clone()) {
                skills.push(SkillItem::new(
                    name,
                    LevelHint::Intermediate,
                    snippets_for(&lowered, keyword),
                ));
            }
        }

        ResumeStruct {
            identity: Identity {
                emails: find_emails(raw_text),
                ..Identity::unknown()
            },
            skills,
            raw_text: raw_text.to_string(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ResumeStructurer for KeywordStructurer {
    async fn structure(
        &self,
        raw_text: &str,
        config: &Configuration,
        canon: &Canonicalizer,
    ) -> ResumeStruct {
        self.scan(raw_text, config, canon)
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

/// Up to three `…context…` excerpts around occurrences of `term`.
fn snippets_for(lowered: &str, term: &str) -> Vec<String> {
    lowered
        .match_indices(term)
        .take(MAX_EVIDENCE_SNIPPETS)
        .map(|(start, m)| {
            let window = context_window(lowered, start, start + m.len(), SNIPPET_RADIUS);
            format!("…{}…", window.replace('\n', " "))
        })
        .collect()
}

/// `text[start..end]` widened by up to `radius` chars on each side.
fn context_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let from = if radius == 0 {
        start
    } else {
        text[..start]
            .char_indices()
            .rev()
            .nth(radius - 1)
            .map(|(i, _)| i)
            .unwrap_or(0)
    };
    let to = text[end..]
        .char_indices()
        .nth(radius)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    &text[from..to]
}

fn find_emails(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    EMAIL
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|email| seen.insert(email.clone()))
        .collect()
}
