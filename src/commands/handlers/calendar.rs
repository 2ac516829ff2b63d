//! Calendar intent handlers
//!
//! Handles: add_event, upcoming_events
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.5.0

use anyhow::Result;
use async_trait::async_trait;
use log::{error, info, warn};
use std::sync::Arc;

use crate::commands::context::AssistantContext;
use crate::commands::handler::{Flow, IntentHandler};
use crate::commands::intent::Intent;
use crate::services::calendar::{describe_upcoming, MAX_UPCOMING};
use crate::services::NewEvent;

const ADD_FAILED: &str = "Sorry, I couldn't add the event.";

/// Handler for calendar intents: add_event, upcoming_events
pub struct CalendarHandler;

#[async_trait]
impl IntentHandler for CalendarHandler {
    fn intents(&self) -> &'static [Intent] {
        &[Intent::AddEvent, Intent::UpcomingEvents]
    }

    async fn handle(
        &self,
        ctx: Arc<AssistantContext>,
        intent: Intent,
        _utterance: &str,
    ) -> Result<Flow> {
        match intent {
            Intent::AddEvent => self.handle_add_event(&ctx).await,
            Intent::UpcomingEvents => self.handle_upcoming(&ctx).await,
            _ => {}
        }
        Ok(Flow::Continue)
    }
}

impl CalendarHandler {
    async fn handle_add_event(&self, ctx: &AssistantContext) {
        let title = ctx.ask("What is the title of the event?").await;
        let date = ctx
            .ask("When is the event? Please say the date in YYYY-MM-DD format.")
            .await;
        let time = ctx
            .ask("At what time is the event? Please say the time in HH:MM format.")
            .await;

        if title.is_empty() || date.is_empty() || time.is_empty() {
            ctx.say("Event details not understood.").await;
            return;
        }

        let event = match NewEvent::from_slots(&title, &date, &time) {
            Ok(event) => event,
            Err(e) => {
                warn!("Event rejected: {e}");
                ctx.say(ADD_FAILED).await;
                return;
            }
        };

        match ctx.call("calendar", ctx.services.calendar.add_event(&event)).await {
            Ok(()) => {
                info!("Added event {:?} at {}", event.title, event.start);
                ctx.say(&format!("Event {} added to your calendar.", event.title))
                    .await;
            }
            Err(e) => {
                error!("Calendar error: {e}");
                ctx.say(ADD_FAILED).await;
            }
        }
    }

    async fn handle_upcoming(&self, ctx: &AssistantContext) {
        let reply = match ctx
            .call("calendar", ctx.services.calendar.upcoming(MAX_UPCOMING))
            .await
        {
            Ok(events) => describe_upcoming(&events),
            Err(e) => {
                error!("Calendar error: {e}");
                "Sorry, I couldn't fetch the events.".to_string()
            }
        };
        ctx.say(&reply).await;
    }
}
