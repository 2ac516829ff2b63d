//! Speech output channel
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Split long responses into segments before handing them to TTS
//! - 1.0.0: Console and TTS-command outputs

use async_trait::async_trait;
use log::{debug, warn};
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::core::{speech_segments, SPEECH_SEGMENT_LIMIT};

/// Upper bound on a single TTS invocation
const TTS_SEGMENT_TIMEOUT: Duration = Duration::from_secs(60);

/// Where the assistant's responses go.
///
/// Shared between the main loop and reminder tasks, so implementations must
/// accept concurrent calls. Each call is delivered whole; ordering between
/// concurrent callers is not guaranteed.
#[async_trait]
pub trait SpeechOutput: Send + Sync {
    async fn say(&self, text: &str);
}

/// Prints responses to stdout
#[derive(Default)]
pub struct ConsoleOutput {
    lock: Mutex<()>,
}

impl ConsoleOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SpeechOutput for ConsoleOutput {
    async fn say(&self, text: &str) {
        let _guard = self.lock.lock().await;
        println!("Assistant: {text}");
    }
}

/// Prints responses and reads them aloud through an external TTS program
pub struct SpokenOutput {
    program: String,
    args: Vec<String>,
    rate: u32,
    lock: Mutex<()>,
}

impl SpokenOutput {
    /// `command` is the program followed by its argument template
    pub fn new(command: &[String], rate: u32) -> anyhow::Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| anyhow::anyhow!("TTS command is empty"))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            rate,
            lock: Mutex::new(()),
        })
    }

    async fn speak_segment(&self, segment: &str) -> anyhow::Result<()> {
        let args = substitute_tts_args(&self.args, segment, self.rate);
        let mut cmd = Command::new(&self.program);
        cmd.args(&args)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true);

        let output = timeout(TTS_SEGMENT_TIMEOUT, cmd.output())
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
impl SpeechOutput for SpokenOutput {
    async fn say(&self, text: &str) {
        let _guard = self.lock.lock().await;
        println!("Assistant: {text}");

        for segment in speech_segments(text, SPEECH_SEGMENT_LIMIT) {
            debug!("Speaking {} chars via {}", segment.len(), self.program);
            if let Err(e) = self.speak_segment(&segment).await {
                warn!("TTS failed, continuing with console output only: {e}");
                break;
            }
        }
    }
}

/// Fill `{text}` and `{rate}` placeholders in a TTS argument template.
///
/// Each argument is passed to the program as-is (no shell), so the spoken
/// text needs no escaping. If no argument mentions `{text}`, the text is
/// appended as the final argument.
pub fn substitute_tts_args(template: &[String], text: &str, rate: u32) -> Vec<String> {
    let rate = rate.to_string();
    let mut args: Vec<String> = template
        .iter()
        .map(|arg| arg.replace("{rate}", &rate).replace("{text}", text))
        .collect();

    if !template.iter().any(|arg| arg.contains("{text}")) {
        args.push(text.to_string());
    }
    args
}
