//! Messaging intent handlers
//!
//! Handles: whatsapp, send_email, check_emails
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.4.0
//!
//! ## Changelog
//! - 1.1.0: Email send and unread count
//! - 1.0.0: WhatsApp instant messages

use anyhow::Result;
use async_trait::async_trait;
use log::{error, info, warn};
use std::sync::Arc;

use crate::commands::context::AssistantContext;
use crate::commands::handler::{Flow, IntentHandler};
use crate::commands::intent::Intent;
use crate::services::{EmailAddress, PhoneNumber};

const NUMBER_PROMPT: &str = "Whom do you want to message? Say the mobile number with country code.";
const INVALID_NUMBER: &str = "That doesn't sound like a valid number.";
const INVALID_ADDRESS: &str = "That doesn't sound like a valid email address.";

/// Handler for messaging intents: whatsapp, send_email, check_emails
pub struct MessagingHandler;

#[async_trait]
impl IntentHandler for MessagingHandler {
    fn intents(&self) -> &'static [Intent] {
        &[Intent::WhatsApp, Intent::SendEmail, Intent::CheckEmails]
    }

    async fn handle(
        &self,
        ctx: Arc<AssistantContext>,
        intent: Intent,
        _utterance: &str,
    ) -> Result<Flow> {
        match intent {
            Intent::WhatsApp => self.handle_whatsapp(&ctx).await,
            Intent::SendEmail => self.handle_send_email(&ctx).await,
            Intent::CheckEmails => self.handle_check_emails(&ctx).await,
            _ => {}
        }
        Ok(Flow::Continue)
    }
}

impl MessagingHandler {
    async fn handle_whatsapp(&self, ctx: &AssistantContext) {
        let spoken = ctx.ask(NUMBER_PROMPT).await;
        let number = match PhoneNumber::parse(&spoken) {
            Ok(number) => number,
            Err(e) => {
                warn!("{e}");
                ctx.say(INVALID_NUMBER).await;
                return;
            }
        };

        let message = ctx.ask("What message should I send?").await;
        if message.is_empty() {
            ctx.say("I didn't hear the message clearly.").await;
            return;
        }

        match ctx
            .call("messaging", ctx.services.messaging.send_instant(&number, &message))
            .await
        {
            Ok(()) => {
                info!("WhatsApp message sent to {number}");
                ctx.say("Sending message now!").await;
            }
            Err(e) => {
                error!("WhatsApp error: {e}");
                ctx.say("Failed to send message.").await;
            }
        }
    }

    async fn handle_send_email(&self, ctx: &AssistantContext) {
        let to = ctx
            .ask("To whom should I send the email? Please say the recipient's email address.")
            .await;
        let subject = ctx.ask("What is the subject of the email?").await;
        let body = ctx.ask("What is the message of the email?").await;

        if to.is_empty() || subject.is_empty() || body.is_empty() {
            ctx.say("Email details not understood.").await;
            return;
        }

        let address = match EmailAddress::parse(&to) {
            Ok(address) => address,
            Err(e) => {
                warn!("{e}");
                ctx.say(INVALID_ADDRESS).await;
                return;
            }
        };

        match ctx
            .call("email", ctx.services.email.send(&address, &subject, &body))
            .await
        {
            Ok(()) => ctx.say(&format!("Email sent to {address}.")).await,
            Err(e) => {
                error!("Email error: {e}");
                ctx.say("Sorry, I couldn't send the email.").await;
            }
        }
    }

    async fn handle_check_emails(&self, ctx: &AssistantContext) {
        let reply = match ctx.call("email", ctx.services.email.unread_count()).await {
            Ok(0) => "No unread emails.".to_string(),
            Ok(count) => format!("You have {count} unread emails."),
            Err(e) => {
                error!("Email error: {e}");
                "Sorry, I couldn't check for unread emails.".to_string()
            }
        };
        ctx.say(&reply).await;
    }
}
