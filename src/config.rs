use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::i18n::Language;

#[derive(Debug, Clone)]
pub struct Config {
    // Content API
    pub api_base_url: String,
    pub request_timeout: Duration,

    // Language
    pub default_language: Language,
    pub language_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let default_language = match std::env::var("PORTFOLIO_DEFAULT_LANGUAGE") {
            Ok(code) => Language::from_code(&code)
                .and_then(Language::ensure_selectable)
                .with_context(|| format!("PORTFOLIO_DEFAULT_LANGUAGE '{}' is not supported", code))?,
            Err(_) => Language::default_language(),
        };

        Ok(Self {
            api_base_url: std::env::var("PORTFOLIO_API_URL")
                .context("PORTFOLIO_API_URL not set")?,
            request_timeout: Duration::from_secs(
                std::env::var("PORTFOLIO_API_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            ),

            default_language,
            language_file: std::env::var("PORTFOLIO_LANGUAGE_FILE")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        })
    }
}
