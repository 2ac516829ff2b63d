//! Reminder intent handler
//!
//! Handles: set_reminder
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Spoken time-of-day slots instead of relative durations
//! - 1.0.0: Extracted from the monolithic command loop

use anyhow::Result;
use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

use crate::commands::context::AssistantContext;
use crate::commands::handler::{Flow, IntentHandler};
use crate::commands::intent::Intent;

const TIME_PROMPT: &str = "At what time should I remind you? Say the time in HH:MM AM or PM format.";
const MESSAGE_PROMPT: &str = "What should I remind you about?";

/// Handler for set_reminder
pub struct RemindHandler;

#[async_trait]
impl IntentHandler for RemindHandler {
    fn intents(&self) -> &'static [Intent] {
        &[Intent::SetReminder]
    }

    async fn handle(
        &self,
        ctx: Arc<AssistantContext>,
        _intent: Intent,
        _utterance: &str,
    ) -> Result<Flow> {
        let time = ctx.ask(TIME_PROMPT).await;
        let message = ctx.ask(MESSAGE_PROMPT).await;

        if time.is_empty() || message.is_empty() {
            ctx.say("Reminder time or message not understood.").await;
            return Ok(Flow::Continue);
        }

        match ctx.reminders.schedule(&time, &message) {
            Ok(handle) => {
                info!("Reminder {} set for {}", handle.id, handle.fire_at);
                ctx.say(&format!("Reminder set for {time} to {message}")).await;
            }
            Err(e) => {
                warn!("Reminder rejected: {e}");
                ctx.say("Sorry, I couldn't set the reminder.").await;
            }
        }
        Ok(Flow::Continue)
    }
}
