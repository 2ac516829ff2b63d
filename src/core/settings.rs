//! # Assistant Settings
//!
//! YAML-based, non-secret runtime settings. Every field has a default so an
//! empty or missing file yields a working console assistant.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.4.0
//!
//! ## Changelog
//! - 1.1.0: Base URLs for every provider so deployments can point at proxies
//! - 1.0.0: Initial schema with speech, services, calendar, answer sections

use anyhow::{Context, Result};
use chrono::{FixedOffset, Offset, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Where utterances come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Typed lines on stdin
    #[default]
    Console,
    /// Microphone recording plus Whisper transcription
    Voice,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub input_mode: InputMode,
    pub speech: SpeechSettings,
    /// Program that opens a URL in the desktop browser
    pub launcher_command: String,
    pub services: ServiceSettings,
    pub calendar: CalendarSettings,
    pub answers: AnswerSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SpeechSettings {
    /// TTS program and arguments; `{text}` and `{rate}` are substituted.
    /// Empty means console output only.
    pub tts_command: Vec<String>,
    /// Words per minute handed to the TTS program
    pub tts_rate: u32,
    /// Recorder program and arguments; `{output}` is substituted
    pub record_command: Vec<String>,
    pub recording_path: String,
    pub transcription_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Upper bound on any single external call
    pub timeout_seconds: u64,
    pub news_country: String,
    pub forecast_days: u32,
    pub weather_base_url: String,
    pub news_base_url: String,
    pub search_base_url: String,
    pub calendar_base_url: String,
    pub gmail_base_url: String,
    pub wikipedia_base_url: String,
    /// MPRIS controller used for play/pause/skip
    pub music_controller: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CalendarSettings {
    pub time_zone: String,
    pub utc_offset: String,
    pub event_minutes: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnswerSettings {
    /// Questions shorter than this are sent back for more detail
    pub min_question_words: usize,
    /// Characters of encyclopedia summary used as QA context
    pub context_chars: usize,
    pub summary_max_words: usize,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            tts_command: Vec::new(),
            tts_rate: 150,
            record_command: ["arecord", "-q", "-d", "5", "-f", "cd", "{output}"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            recording_path: "listen.wav".to_string(),
            transcription_url: "https://api.openai.com/v1/audio/transcriptions".to_string(),
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            news_country: "in".to_string(),
            forecast_days: 3,
            weather_base_url: "http://api.weatherapi.com".to_string(),
            news_base_url: "https://newsapi.org".to_string(),
            search_base_url: "https://api.bing.microsoft.com".to_string(),
            calendar_base_url: "https://www.googleapis.com".to_string(),
            gmail_base_url: "https://gmail.googleapis.com".to_string(),
            wikipedia_base_url: "https://en.wikipedia.org".to_string(),
            music_controller: "playerctl".to_string(),
        }
    }
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            time_zone: "Asia/Kolkata".to_string(),
            utc_offset: "+05:30".to_string(),
            event_minutes: 30,
        }
    }
}

impl Default for AnswerSettings {
    fn default() -> Self {
        Self {
            min_question_words: 3,
            context_chars: 1000,
            summary_max_words: 60,
        }
    }
}

fn default_launcher() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn load(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {path}"))?;
        let settings = Self::from_yaml(&contents)
            .with_context(|| format!("Failed to parse settings file {path}"))?;
        Ok(settings)
    }

    /// Load settings if the file exists, otherwise use defaults
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            let settings = Self::load(path)?;
            info!("Loaded settings from {path}");
            Ok(settings)
        } else {
            info!("No settings file at {path} - using defaults");
            let mut settings = Self::default();
            settings.fill_platform_defaults();
            Ok(settings)
        }
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let mut settings: Settings = if contents.trim().is_empty() {
            Settings::default()
        } else {
            serde_yaml::from_str(contents)?
        };
        settings.fill_platform_defaults();
        settings.validate()?;
        Ok(settings)
    }

    fn fill_platform_defaults(&mut self) {
        if self.launcher_command.trim().is_empty() {
            self.launcher_command = default_launcher().to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.services.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("services.timeout_seconds must be positive"));
        }

        if !(1..=14).contains(&self.services.forecast_days) {
            return Err(anyhow::anyhow!(
                "services.forecast_days must be between 1 and 14, got {}",
                self.services.forecast_days
            ));
        }

        self.calendar
            .utc_offset
            .parse::<FixedOffset>()
            .map_err(|e| {
                anyhow::anyhow!(
                    "calendar.utc_offset {:?} is not an offset like +05:30: {}",
                    self.calendar.utc_offset,
                    e
                )
            })?;

        if self.calendar.event_minutes == 0 {
            return Err(anyhow::anyhow!("calendar.event_minutes must be positive"));
        }

        if self.answers.min_question_words == 0 {
            return Err(anyhow::anyhow!("answers.min_question_words must be positive"));
        }

        if self.input_mode == InputMode::Voice {
            if self.speech.record_command.is_empty() {
                return Err(anyhow::anyhow!(
                    "speech.record_command is required in voice mode"
                ));
            }
            if !self.speech.record_command.iter().any(|a| a.contains("{output}")) {
                return Err(anyhow::anyhow!(
                    "speech.record_command must contain an {{output}} placeholder"
                ));
            }
        }

        Ok(())
    }

    pub fn service_timeout(&self) -> Duration {
        Duration::from_secs(self.services.timeout_seconds)
    }

    /// Parsed calendar offset; `validate` guarantees it parses
    pub fn calendar_offset(&self) -> FixedOffset {
        self.calendar
            .utc_offset
            .parse()
            .unwrap_or_else(|_| Utc.fix())
    }
}
