//! Utility intent handlers
//!
//! Handles: time, battery, exit
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Spoken time, battery status and exit
//! - 1.0.0: Extracted from the monolithic command loop

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Local, NaiveTime};
use log::info;
use std::sync::Arc;

use crate::commands::context::AssistantContext;
use crate::commands::handler::{Flow, IntentHandler};
use crate::commands::intent::Intent;

pub const GOODBYE: &str = "Goodbye! Have a great day!";
const NO_BATTERY: &str = "Battery information not available.";

/// Handler for utility intents: time, battery, exit
pub struct UtilityHandler;

#[async_trait]
impl IntentHandler for UtilityHandler {
    fn intents(&self) -> &'static [Intent] {
        &[Intent::Time, Intent::Battery, Intent::Exit]
    }

    async fn handle(
        &self,
        ctx: Arc<AssistantContext>,
        intent: Intent,
        _utterance: &str,
    ) -> Result<Flow> {
        match intent {
            Intent::Time => {
                ctx.say(&time_response(Local::now().time())).await;
            }
            Intent::Battery => {
                let probe = ctx.services.battery.query();
                let status = tokio::time::timeout(ctx.service_timeout(), probe)
                    .await
                    .ok()
                    .flatten();
                let reply = match status {
                    Some(status) => status.describe(),
                    None => NO_BATTERY.to_string(),
                };
                ctx.say(&reply).await;
            }
            Intent::Exit => {
                info!("Exit requested");
                ctx.say(GOODBYE).await;
                return Ok(Flow::Exit);
            }
            _ => {}
        }
        Ok(Flow::Continue)
    }
}

/// "The time is HH:MM AM|PM"
pub fn time_response(now: NaiveTime) -> String {
    format!("The time is {}", now.format("%I:%M %p"))
}
