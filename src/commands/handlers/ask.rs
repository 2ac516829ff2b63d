//! Fallback question answering
//!
//! Handles: fallback
//!
//! Anything that matches no trigger is treated as a question: an
//! encyclopedia summary supplies the context and the QA model extracts an
//! answer from it.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 2.0.0: Answers grounded on encyclopedia context
//! - 1.0.0: Direct model answers

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, error};
use std::sync::Arc;

use crate::commands::context::AssistantContext;
use crate::commands::handler::{Flow, IntentHandler};
use crate::commands::intent::Intent;

pub const CHECKING: &str = "Let me check that for you.";
pub const NEED_DETAILS: &str = "Please provide more details or complete your question.";
pub const NOTHING_FOUND: &str = "Sorry, I couldn't find any information on that.";
pub const NOT_SURE: &str = "I'm not sure about that. Would you like me to search the web?";
pub const ISSUE: &str = "Sorry, I encountered an issue.";

/// Handler for utterances no trigger matched
pub struct AskHandler;

#[async_trait]
impl IntentHandler for AskHandler {
    fn intents(&self) -> &'static [Intent] {
        &[Intent::Fallback]
    }

    async fn handle(
        &self,
        ctx: Arc<AssistantContext>,
        _intent: Intent,
        utterance: &str,
    ) -> Result<Flow> {
        ctx.say(CHECKING).await;
        let answer = answer_question(&ctx, utterance).await;
        ctx.say(&answer).await;
        Ok(Flow::Continue)
    }
}

/// Produce the spoken answer for a free-form question
pub async fn answer_question(ctx: &AssistantContext, question: &str) -> String {
    if question.split_whitespace().count() < ctx.settings.answers.min_question_words {
        return NEED_DETAILS.to_string();
    }

    let context = match ctx.call("knowledge", ctx.services.knowledge.lookup(question)).await {
        Ok(Some(context)) => context,
        Ok(None) => return NOTHING_FOUND.to_string(),
        Err(e) => {
            error!("Knowledge lookup error: {e}");
            return ISSUE.to_string();
        }
    };
    debug!("Answering from {} chars of context", context.chars().count());

    match ctx.call("models", ctx.services.qa.answer(question, &context)).await {
        Ok(answer) => {
            let answer = answer.trim();
            if answer.is_empty() || answer.to_lowercase().contains("sorry") {
                NOT_SURE.to_string()
            } else {
                answer.to_string()
            }
        }
        Err(e) => {
            error!("Model error: {e}");
            ISSUE.to_string()
        }
    }
}
