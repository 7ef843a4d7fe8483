use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::generation::Strategy;

/// Application configuration loaded from environment variables.
/// Every setting has a default so the service starts against a stock local Ollama.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub ollama_temperature: f32,
    pub ollama_timeout_secs: u64,
    pub strategy: Strategy,
    /// `None` keeps the strategy default (templated: on, generated: off).
    pub include_program_relevance: Option<bool>,
    pub data_dir: PathBuf,
    pub soffice_path: Option<PathBuf>,
    pub pdf_conversion_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            ollama_base_url: env_or("OLLAMA_BASE_URL", "http://localhost:11434"),
            ollama_model: env_or("OLLAMA_MODEL", "llama3.1:8b"),
            ollama_temperature: parse_env("OLLAMA_TEMPERATURE", 0.7)
                .context("OLLAMA_TEMPERATURE must be a number")?,
            ollama_timeout_secs: parse_env("OLLAMA_TIMEOUT_SECS", 120)
                .context("OLLAMA_TIMEOUT_SECS must be a whole number of seconds")?,
            strategy: parse_env("SOP_STRATEGY", Strategy::Generated)
                .context("SOP_STRATEGY must be 'generated' or 'templated'")?,
            include_program_relevance: optional_env("SOP_INCLUDE_PROGRAM_RELEVANCE")
                .map(|v| v.parse::<bool>())
                .transpose()
                .context("SOP_INCLUDE_PROGRAM_RELEVANCE must be 'true' or 'false'")?,
            data_dir: PathBuf::from(env_or("SOP_DATA_DIR", "data")),
            soffice_path: optional_env("SOFFICE_PATH").map(PathBuf::from),
            pdf_conversion_timeout_secs: parse_env("PDF_CONVERSION_TIMEOUT_SECS", 30)
                .context("PDF_CONVERSION_TIMEOUT_SECS must be a whole number of seconds")?,
        })
    }

    /// Whether the registry carries the optional program-relevance section.
    pub fn program_relevance_enabled(&self) -> bool {
        self.include_program_relevance
            .unwrap_or(self.strategy == Strategy::Templated)
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid value '{raw}' for environment variable '{key}'")),
        None => Ok(default),
    }
}
