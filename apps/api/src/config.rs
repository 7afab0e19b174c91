use anyhow::{Context, Result};

use crate::llm_client::anthropic::{ANTHROPIC_API_URL, DEFAULT_ANTHROPIC_MODEL};
use crate::llm_client::groq::{DEFAULT_GROQ_MODEL, GROQ_API_URL};
use crate::llm_client::MAX_RETRIES_CAP;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub llm: LlmConfig,
    pub port: u16,
    pub rust_log: String,
}

/// Provider credentials and call limits handed to the generation gateway.
///
/// Both keys are optional: a provider without a key is skipped by the gateway
/// and recorded as a credential failure.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub anthropic_url: String,
    pub groq_api_key: Option<String>,
    pub groq_model: String,
    pub groq_url: String,
    pub timeout_secs: u64,
    /// Extra attempts per provider on 429/5xx/transport errors. 0 = single attempt.
    /// Clamped to `MAX_RETRIES_CAP`.
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            anthropic_model: DEFAULT_ANTHROPIC_MODEL.to_string(),
            anthropic_url: ANTHROPIC_API_URL.to_string(),
            groq_api_key: None,
            groq_model: DEFAULT_GROQ_MODEL.to_string(),
            groq_url: GROQ_API_URL.to_string(),
            timeout_secs: 60,
            max_retries: 0,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", 10)?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            llm: LlmConfig::from_env()?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl LlmConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = LlmConfig::default();

        Ok(LlmConfig {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            anthropic_model: optional_env("ANTHROPIC_MODEL").unwrap_or(defaults.anthropic_model),
            anthropic_url: optional_env("ANTHROPIC_BASE_URL").unwrap_or(defaults.anthropic_url),
            groq_api_key: optional_env("GROQ_API_KEY"),
            groq_model: optional_env("GROQ_MODEL").unwrap_or(defaults.groq_model),
            groq_url: optional_env("GROQ_BASE_URL").unwrap_or(defaults.groq_url),
            timeout_secs: parse_env("LLM_TIMEOUT_SECS", defaults.timeout_secs)?,
            max_retries: parse_env("LLM_MAX_RETRIES", defaults.max_retries)?
                .min(MAX_RETRIES_CAP),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank variables are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
