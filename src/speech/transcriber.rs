//! # Feature: Speech Transcription
//!
//! Whisper-powered transcription of short microphone recordings.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.1.0: Bounded timeout on the upload, JSON error bodies surfaced
//! - 1.0.0: Initial release with Whisper API integration via curl

use anyhow::Result;
use log::{debug, error, info};
use std::time::Duration;
use tokio::fs;
use tokio::process::Command;
use tokio::time::timeout;

/// Whisper model used for transcription
const WHISPER_MODEL: &str = "whisper-1";

#[derive(Clone)]
pub struct Transcriber {
    api_key: String,
    endpoint: String,
    request_timeout: Duration,
}

impl Transcriber {
    pub fn new(api_key: String, endpoint: String, request_timeout: Duration) -> Self {
        Transcriber {
            api_key,
            endpoint,
            request_timeout,
        }
    }

    /// Upload a recording and return its transcript (possibly empty)
    pub async fn transcribe_file(&self, file_path: &str) -> Result<String> {
        debug!("Transcribing recording: {file_path}");

        if fs::metadata(file_path).await.is_err() {
            return Err(anyhow::anyhow!("Recording not found: {}", file_path));
        }

        let mut cmd = Command::new("curl");
        cmd.args([
            "-sS",
            &self.endpoint,
            "-H",
            &format!("Authorization: Bearer {}", self.api_key),
            "-H",
            "Content-Type: multipart/form-data",
            "-F",
            &format!("file=@{file_path}"),
            "-F",
            &format!("model={WHISPER_MODEL}"),
        ])
        .kill_on_drop(true);

        let output = timeout(self.request_timeout, cmd.output())
            .await
            .map_err(|_| {
                anyhow::anyhow!(
                    "Transcription timed out after {}s",
                    self.request_timeout.as_secs()
                )
            })??;

        if !output.status.success() {
            let error_msg = String::from_utf8_lossy(&output.stderr);
            error!("Transcription failed: {error_msg}");
            return Err(anyhow::anyhow!("Transcription failed: {}", error_msg));
        }

        let response = String::from_utf8(output.stdout)?;
        let text = parse_transcription(&response)?;
        info!("Transcription successful, length: {} characters", text.len());
        Ok(text)
    }
}

/// Extract the transcript from a Whisper JSON response
pub fn parse_transcription(response: &str) -> Result<String> {
    let json: serde_json::Value = serde_json::from_str(response)?;

    if let Some(text) = json.get("text").and_then(|t| t.as_str()) {
        Ok(text.trim().to_string())
    } else if let Some(error) = json.get("error") {
        error!("OpenAI API error: {error}");
        Err(anyhow::anyhow!("OpenAI API error: {}", error))
    } else {
        error!("Unexpected response format: {response}");
        Err(anyhow::anyhow!("Unexpected response format"))
    }
}
