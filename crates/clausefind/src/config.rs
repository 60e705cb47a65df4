//! TOML configuration.
//!
//! Every field has a default, and a missing config file simply yields the
//! default configuration — `clf` works out of the box. The `[retrieval]`
//! values are defaults for the per-call limits and are clamped into the
//! same ranges the tools enforce.

use anyhow::{Context, Result};
use clausefind_core::scoring::{
    DEFAULT_EXCERPT_MAX_CHARS, DEFAULT_MAX_RESULTS, EXCERPT_MAX_CHARS_MAX, EXCERPT_MAX_CHARS_MIN,
    MAX_RESULTS_MAX, MAX_RESULTS_MIN, RankLimits,
};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7399".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    /// Default result cap when a call does not supply `max_results`.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Default excerpt window when a call does not supply
    /// `excerpt_max_chars`.
    #[serde(default = "default_excerpt_max_chars")]
    pub excerpt_max_chars: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            excerpt_max_chars: default_excerpt_max_chars(),
        }
    }
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_excerpt_max_chars() -> usize {
    DEFAULT_EXCERPT_MAX_CHARS
}

impl Config {
    /// The ranking limits this configuration defaults to.
    pub fn default_limits(&self) -> RankLimits {
        RankLimits {
            max_results: self.retrieval.max_results,
            excerpt_max_chars: self.retrieval.excerpt_max_chars,
        }
    }
}

/// Load configuration from a TOML file; a missing file means defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }
    if !(MAX_RESULTS_MIN..=MAX_RESULTS_MAX).contains(&config.retrieval.max_results) {
        anyhow::bail!(
            "retrieval.max_results must be between {} and {}",
            MAX_RESULTS_MIN,
            MAX_RESULTS_MAX
        );
    }
    if !(EXCERPT_MAX_CHARS_MIN..=EXCERPT_MAX_CHARS_MAX)
        .contains(&config.retrieval.excerpt_max_chars)
    {
        anyhow::bail!(
            "retrieval.excerpt_max_chars must be between {} and {}",
            EXCERPT_MAX_CHARS_MIN,
            EXCERPT_MAX_CHARS_MAX
        );
    }

    Ok(config)
}
