// Scoring core: JD → Configuration → canonical skills → hybrid score → ranking.
// Every step takes the Configuration explicitly; only handlers.rs touches HTTP.

pub mod canonicalizer;
pub mod engine;
pub mod handlers;
pub mod jd_config;
pub mod ranker;
