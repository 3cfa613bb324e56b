use anyhow::{Context, Result};

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_LLAMA_CLOUD_BASE_URL: &str = "https://api.cloud.llamaindex.ai";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_api_base: String,
    /// `None` disables the hosted parser; uploads go straight to local extraction.
    pub llama_cloud_api_key: Option<String>,
    pub llama_cloud_base_url: String,
    pub llama_parse_timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let max_upload_bytes = mb_to_bytes(parse_env("MAX_UPLOAD_MB", 10)?)
            .context("MAX_UPLOAD_MB is too large")?;

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_api_base: optional_env("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            llama_cloud_api_key: optional_env("LLAMA_CLOUD_API_KEY"),
            llama_cloud_base_url: optional_env("LLAMA_CLOUD_BASE_URL")
                .unwrap_or_else(|| DEFAULT_LLAMA_CLOUD_BASE_URL.to_string()),
            llama_parse_timeout_secs: parse_env("LLAMA_PARSE_TIMEOUT_SECS", 120)?,
            max_upload_bytes,
            port: parse_env("PORT", 8080)?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn mb_to_bytes(mb: usize) -> Option<usize> {
    mb.checked_mul(1024 * 1024)
}

fn require_env(key: &str) -> Result<String> {
    optional_env(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Blank values are treated the same as unset ones.
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
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
