//! Shared context for intent handlers
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Speech channels, service handles and reminder scheduler
//! - 1.0.0: Initial implementation with core shared state

use log::{debug, warn};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::core::{RecognitionError, ServiceError, Settings};
use crate::features::reminders::ReminderScheduler;
use crate::services::{with_timeout, Services};
use crate::speech::{SpeechInput, SpeechOutput};

pub const NOT_UNDERSTOOD_REPLY: &str = "Sorry, I didn't get that. Please repeat.";
pub const NETWORK_ERROR_REPLY: &str = "Network error.";

/// Shared context for all intent handlers
///
/// Contains the speech channels, every external service, the reminder
/// scheduler and the runtime settings.
pub struct AssistantContext {
    pub input: Arc<dyn SpeechInput>,
    pub output: Arc<dyn SpeechOutput>,
    pub services: Services,
    pub reminders: Arc<ReminderScheduler>,
    pub settings: Arc<Settings>,
}

impl AssistantContext {
    pub fn new(
        input: Arc<dyn SpeechInput>,
        output: Arc<dyn SpeechOutput>,
        services: Services,
        reminders: Arc<ReminderScheduler>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            input,
            output,
            services,
            reminders,
            settings,
        }
    }

    pub async fn say(&self, text: &str) {
        self.output.say(text).await;
    }

    /// Read the next utterance.
    ///
    /// Recognition failures are answered aloud and yield an empty utterance;
    /// only [`RecognitionError::EndOfInput`] is passed through.
    pub async fn listen(&self) -> Result<String, RecognitionError> {
        match self.input.listen().await {
            Ok(utterance) => {
                debug!("Heard {utterance:?}");
                Ok(utterance)
            }
            Err(RecognitionError::NotUnderstood) => {
                self.say(NOT_UNDERSTOOD_REPLY).await;
                Ok(String::new())
            }
            Err(RecognitionError::Network(reason)) => {
                warn!("Speech recognition failed: {reason}");
                self.say(NETWORK_ERROR_REPLY).await;
                Ok(String::new())
            }
            Err(RecognitionError::EndOfInput) => Err(RecognitionError::EndOfInput),
        }
    }

    /// Speak `prompt` and wait for a single slot value; empty if nothing usable was heard
    pub async fn ask(&self, prompt: &str) -> String {
        self.say(prompt).await;
        self.listen().await.unwrap_or_default()
    }

    /// Upper bound on one external call
    pub fn service_timeout(&self) -> Duration {
        self.settings.service_timeout()
    }

    /// Run a service call under the configured timeout
    pub async fn call<T, F>(&self, service: &'static str, call: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, ServiceError>>,
    {
        with_timeout(service, self.service_timeout(), call).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context_with, context_with_input, DelayedInput, FakeServices};
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_listen_answers_recognition_failures() {
        let (ctx, output) = context_with(
            vec![
                Err(RecognitionError::NotUnderstood),
                Err(RecognitionError::Network("offline".to_string())),
                Ok("hello".to_string()),
            ],
            FakeServices::default(),
        );

        assert_eq!(ctx.listen().await.unwrap(), "");
        assert_eq!(ctx.listen().await.unwrap(), "");
        assert_eq!(ctx.listen().await.unwrap(), "hello");
        assert_eq!(output.said(), vec![NOT_UNDERSTOOD_REPLY, NETWORK_ERROR_REPLY]);
    }

    #[tokio::test]
    async fn test_ask_prompts_then_listens() {
        let (ctx, output) = context_with(vec![Ok("pune".to_string())], FakeServices::default());

        assert_eq!(ctx.ask("Which city?").await, "pune");
        // Script exhausted: end of input reads as an empty slot
        assert_eq!(ctx.ask("Again?").await, "");
        assert_eq!(output.said(), vec!["Which city?", "Again?"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_applies_service_timeout() {
        let (ctx, _output) = context_with(vec![], FakeServices::default());
        let result: Result<(), ServiceError> = ctx
            .call("weather", async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(ServiceError::Timeout { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reminder_speaks_while_waiting_on_a_slot() {
        let input = Arc::new(DelayedInput::new(Duration::from_secs(120), "stretch"));
        let (ctx, output) = context_with_input(input, FakeServices::default());
        let now = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(9, 59, 0)
            .unwrap();

        ctx.reminders
            .schedule_from(now, "10:00 am", "drink water")
            .unwrap();
        let answer = ctx.ask("What should I remind you about?").await;

        assert_eq!(answer, "stretch");
        assert_eq!(
            output.said(),
            vec!["What should I remind you about?", "Reminder: drink water"]
        );
        assert!(ctx.reminders.pending().is_empty());
    }
}
