//! Email (Gmail REST API)
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.5.0

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use std::fmt;

use super::{base_url, fetch_json, require_key};
use crate::core::{ServiceError, ValidationError};

const SERVICE: &str = "email";

/// A recipient address that passed a basic shape check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Accepts spoken addresses such as "alice at example dot com"
    pub fn parse(spoken: &str) -> Result<Self, ValidationError> {
        let normalized = spoken
            .trim()
            .to_lowercase()
            .replace(" at ", "@")
            .replace(" dot ", ".")
            .replace(' ', "");

        let valid = match normalized.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
            }
            None => false,
        };

        if valid {
            Ok(Self(normalized))
        } else {
            Err(ValidationError::EmailAddress(spoken.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, to: &EmailAddress, subject: &str, body: &str) -> Result<(), ServiceError>;
    /// Messages labelled both INBOX and UNREAD
    async fn unread_count(&self) -> Result<usize, ServiceError>;
}

/// RFC 2822 message encoded the way the Gmail `raw` field expects
pub fn encode_message(to: &EmailAddress, subject: &str, body: &str) -> String {
    let message = format!(
        "To: {to}\r\nSubject: {subject}\r\nContent-Type: text/plain; charset=\"UTF-8\"\r\n\r\n{body}"
    );
    URL_SAFE.encode(message.as_bytes())
}

#[derive(Deserialize)]
struct SentMessage {
    #[serde(default)]
    id: String,
}

#[derive(Deserialize)]
struct MessageList {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Deserialize)]
struct MessageRef {
    #[allow(dead_code)]
    id: String,
}

pub struct GmailClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GmailClient {
    pub fn new(client: reqwest::Client, base: &str, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url(base),
            token,
        }
    }
}

#[async_trait]
impl EmailProvider for GmailClient {
    async fn send(&self, to: &EmailAddress, subject: &str, body: &str) -> Result<(), ServiceError> {
        let token = require_key(SERVICE, &self.token)?;

        let request = self
            .client
            .post(format!("{}/gmail/v1/users/me/messages/send", self.base_url))
            .bearer_auth(token)
            .json(&json!({ "raw": encode_message(to, subject, body) }));
        let sent: SentMessage = fetch_json(SERVICE, request).await?;
        log::debug!("Sent message {} to {to}", sent.id);
        Ok(())
    }

    async fn unread_count(&self) -> Result<usize, ServiceError> {
        let token = require_key(SERVICE, &self.token)?;

        let request = self
            .client
            .get(format!("{}/gmail/v1/users/me/messages", self.base_url))
            .bearer_auth(token)
            .query(&[("labelIds", "INBOX"), ("labelIds", "UNREAD")]);
        let list: MessageList = fetch_json(SERVICE, request).await?;
        Ok(list.messages.len())
    }
}
