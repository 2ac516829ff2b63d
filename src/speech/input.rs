//! Speech input channel
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Voice input via recorder command and Whisper transcription
//! - 1.0.0: Console input

use async_trait::async_trait;
use log::{debug, error, warn};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::time::timeout;

use super::transcriber::Transcriber;
use crate::core::RecognitionError;

/// Source of user utterances.
///
/// `listen` blocks until one utterance is available and returns it trimmed
/// and lowercased. An empty string means the user said nothing usable.
#[async_trait]
pub trait SpeechInput: Send + Sync {
    async fn listen(&self) -> Result<String, RecognitionError>;
}

/// Lowercase and trim a raw transcript
pub fn normalize_transcript(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Reads one utterance per line from stdin
pub struct ConsoleInput {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleInput {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

impl Default for ConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechInput for ConsoleInput {
    async fn listen(&self) -> Result<String, RecognitionError> {
        print!("You: ");
        let _ = std::io::stdout().flush();

        let mut lines = self.lines.lock().await;
        match lines.next_line().await {
            Ok(Some(line)) => Ok(normalize_transcript(&line)),
            Ok(None) => Err(RecognitionError::EndOfInput),
            Err(e) => {
                warn!("Failed to read from stdin: {e}");
                Err(RecognitionError::EndOfInput)
            }
        }
    }
}

/// Records a short clip with an external recorder and transcribes it
pub struct VoiceInput {
    program: String,
    args: Vec<String>,
    recording_path: String,
    transcriber: Transcriber,
    /// Covers the fixed-length recording plus recorder start-up
    record_timeout: Duration,
    lock: Mutex<()>,
}

impl VoiceInput {
    pub fn new(
        record_command: &[String],
        recording_path: String,
        transcriber: Transcriber,
        record_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let (program, args) = record_command
            .split_first()
            .ok_or_else(|| anyhow::anyhow!("Record command is empty"))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            recording_path,
            transcriber,
            record_timeout,
            lock: Mutex::new(()),
        })
    }

    async fn record(&self) -> anyhow::Result<()> {
        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| arg.replace("{output}", &self.recording_path))
            .collect();

        let mut cmd = Command::new(&self.program);
        cmd.args(&args)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true);

        let output = timeout(self.record_timeout, cmd.output())
            .await
            .map_err(|_| anyhow::anyhow!("{} timed out", self.program))??;

        if !output.status.success() {
            return Err(anyhow::anyhow!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SpeechInput for VoiceInput {
    async fn listen(&self) -> Result<String, RecognitionError> {
        let _guard = self.lock.lock().await;

        println!("Listening...");
        if let Err(e) = self.record().await {
            error!("Recording failed: {e}");
            return Err(RecognitionError::NotUnderstood);
        }

        println!("Recognizing...");
        let transcription = self.transcriber.transcribe_file(&self.recording_path).await;

        if let Err(e) = tokio::fs::remove_file(&self.recording_path).await {
            debug!("Failed to cleanup recording {}: {e}", self.recording_path);
        }

        let text = transcription.map_err(|e| RecognitionError::Network(e.to_string()))?;
        let command = normalize_transcript(&text);
        if command.is_empty() {
            return Err(RecognitionError::NotUnderstood);
        }

        println!("You: {command}");
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_transcript() {
        assert_eq!(normalize_transcript("  What Is The TIME  "), "what is the time");
        assert_eq!(normalize_transcript("   "), "");
    }

    #[test]
    fn test_voice_input_requires_program() {
        let transcriber = Transcriber::new(
            "key".to_string(),
            "http://localhost/v1/audio/transcriptions".to_string(),
            Duration::from_secs(5),
        );
        let result = VoiceInput::new(
            &[],
            "listen.wav".to_string(),
            transcriber,
            Duration::from_secs(10),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_failed_recorder_is_not_understood() {
        let transcriber = Transcriber::new(
            "key".to_string(),
            "http://localhost/v1/audio/transcriptions".to_string(),
            Duration::from_secs(5),
        );
        let input = VoiceInput::new(
            &["false".to_string(), "{output}".to_string()],
            "/tmp/concierge-test-listen.wav".to_string(),
            transcriber,
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(input.listen().await, Err(RecognitionError::NotUnderstood));
    }
}
