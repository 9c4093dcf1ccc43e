use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{LlmConfig, ANTHROPIC_API_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};

const DEFAULT_PORT: u16 = 5000;
const LLM_TIMEOUT: Duration = Duration::from_secs(120);
const LLM_RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    /// PostgreSQL connection string. Without it the API keeps reviews in memory.
    pub database_url: Option<String>,
    /// Raw `PORT` value; only `serve` parses it.
    pub port: Option<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let max_tokens = match optional_env("LLM_MAX_TOKENS") {
            Some(raw) => raw
                .parse::<u32>()
                .context("LLM_MAX_TOKENS must be a positive integer")?,
            None => DEFAULT_MAX_TOKENS,
        };

        Ok(Config {
            llm: LlmConfig {
                api_key: optional_env("ANTHROPIC_API_KEY"),
                model: optional_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                api_url: optional_env("LLM_API_URL")
                    .unwrap_or_else(|| ANTHROPIC_API_URL.to_string()),
                max_tokens,
                timeout: LLM_TIMEOUT,
                retry_backoff: LLM_RETRY_BACKOFF,
            },
            database_url: optional_env("DATABASE_URL"),
            port: optional_env("PORT"),
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// The HTTP port from `PORT`, defaulting to 5000.
    pub fn port(&self) -> Result<u16> {
        match &self.port {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got '{raw}'")),
            None => Ok(DEFAULT_PORT),
        }
    }

    /// The API key, which the HTTP API cannot run without.
    pub fn require_api_key(&self) -> Result<&str> {
        self.llm
            .api_key
            .as_deref()
            .context("Required environment variable 'ANTHROPIC_API_KEY' is not set")
    }
}

/// Reads a variable, treating empty values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
