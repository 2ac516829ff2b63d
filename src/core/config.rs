//! Environment configuration (secrets and process-level knobs)
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.2.0: Add LOG_FILE for file logging
//! - 1.1.0: Calendar and Gmail access tokens
//! - 1.0.0: Initial release with provider API keys

use anyhow::Result;
use log::LevelFilter;
use std::env;
use std::str::FromStr;

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_SETTINGS_PATH: &str = "assistant.yaml";

/// Values read from the environment (and `.env` via dotenvy).
///
/// Every provider key is optional: a missing key disables that integration
/// instead of refusing to start.
#[derive(Debug, Clone)]
pub struct Config {
    pub weather_api_key: Option<String>,
    pub news_api_key: Option<String>,
    pub bing_search_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub google_calendar_token: Option<String>,
    pub gmail_token: Option<String>,
    pub log_level: String,
    pub log_file: Option<String>,
    pub settings_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let log_level = non_empty("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        // env_logger accepts full filter specs, but the bare level must be sane
        let bare_level = log_level.split(',').next().unwrap_or_default();
        if !bare_level.contains('=') && LevelFilter::from_str(bare_level).is_err() {
            return Err(anyhow::anyhow!("Invalid LOG_LEVEL: {}", log_level));
        }

        Ok(Config {
            weather_api_key: non_empty("WEATHER_API_KEY"),
            news_api_key: non_empty("NEWS_API_KEY"),
            bing_search_api_key: non_empty("BING_SEARCH_API_KEY"),
            openai_api_key: non_empty("OPENAI_API_KEY"),
            openai_model: non_empty("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            google_calendar_token: non_empty("GOOGLE_CALENDAR_TOKEN"),
            gmail_token: non_empty("GMAIL_TOKEN"),
            log_level,
            log_file: non_empty("LOG_FILE"),
            settings_path: non_empty("ASSISTANT_SETTINGS_PATH")
                .unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_string()),
        })
    }
}
