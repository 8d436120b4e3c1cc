use anyhow::{bail, Context, Result};

use crate::analysis::AnalysisFormat;

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 60 * 60;

/// Application configuration loaded from environment variables.
/// Nothing is strictly required: without `OPENAI_API_KEY` every session
/// must supply its own key.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_api_base: String,
    pub openai_model: String,
    pub analysis_format: AnalysisFormat,
    pub port: u16,
    pub rust_log: String,
    /// Sessions untouched for this long are dropped.
    pub session_idle_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_api_base: optional_env("OPENAI_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            openai_model: optional_env("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            analysis_format: parse_analysis_format(optional_env("ANALYSIS_FORMAT").as_deref())?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            session_idle_ttl_secs: parse_idle_ttl(optional_env("SESSION_IDLE_TTL_SECS").as_deref())?,
        })
    }
}

/// Reads a variable, treating blank values the same as unset ones.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_analysis_format(value: Option<&str>) -> Result<AnalysisFormat> {
    match value.map(str::to_ascii_lowercase).as_deref() {
        None | Some("legacy") => Ok(AnalysisFormat::Legacy),
        Some("structured") => Ok(AnalysisFormat::Structured),
        Some(other) => bail!("ANALYSIS_FORMAT must be 'legacy' or 'structured', got '{other}'"),
    }
}

fn parse_idle_ttl(value: Option<&str>) -> Result<u64> {
    let Some(value) = value else {
        return Ok(DEFAULT_SESSION_IDLE_TTL_SECS);
    };
    let secs = value
        .parse::<u64>()
        .context("SESSION_IDLE_TTL_SECS must be a whole number of seconds")?;
    if secs == 0 {
        bail!("SESSION_IDLE_TTL_SECS must be greater than zero");
    }
    Ok(secs)
}
