//! Instant messages through WhatsApp Web
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.4.0

use async_trait::async_trait;
use log::info;
use regex::Regex;
use std::fmt;
use std::sync::{Arc, OnceLock};

use super::launcher::Launcher;
use crate::core::{ServiceError, ValidationError};

const SERVICE: &str = "messaging";

const WHATSAPP_SEND_URL: &str = "https://web.whatsapp.com/send";

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("valid phone regex"))
}

/// An E.164-shaped phone number, digits only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Strip spaces and `+` from a spoken number, then validate it
    pub fn parse(spoken: &str) -> Result<Self, ValidationError> {
        let digits: String = spoken
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '+')
            .collect();

        if phone_pattern().is_match(&digits) {
            Ok(Self(digits))
        } else {
            Err(ValidationError::PhoneNumber(spoken.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{}", self.0)
    }
}

#[async_trait]
pub trait MessagingProvider: Send + Sync {
    async fn send_instant(&self, to: &PhoneNumber, message: &str) -> Result<(), ServiceError>;
}

/// Opens the WhatsApp Web send page with the number and text pre-filled
pub struct WhatsAppWeb {
    launcher: Arc<dyn Launcher>,
}

impl WhatsAppWeb {
    pub fn new(launcher: Arc<dyn Launcher>) -> Self {
        Self { launcher }
    }
}

/// Send link for a number and message, with the message query-encoded
pub fn send_link(to: &PhoneNumber, message: &str) -> Result<String, ServiceError> {
    let url = reqwest::Url::parse_with_params(
        WHATSAPP_SEND_URL,
        &[("phone", to.as_str()), ("text", message)],
    )
    .map_err(|e| ServiceError::malformed(SERVICE, e))?;
    Ok(url.to_string())
}

#[async_trait]
impl MessagingProvider for WhatsAppWeb {
    async fn send_instant(&self, to: &PhoneNumber, message: &str) -> Result<(), ServiceError> {
        let link = send_link(to, message)?;
        info!("Opening WhatsApp Web for {to}");
        self.launcher.open_url(&link).await
    }
}
