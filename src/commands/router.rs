//! # Command Router
//!
//! Owns the main loop: greet, then listen → acknowledge sentiment → classify
//! → dispatch until a handler asks to exit or input ends.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Registry-based dispatch with errors contained at the boundary
//! - 1.0.0: Single if/else chain over trigger words

use chrono::{Local, Timelike};
use log::{debug, error, info, warn};
use std::sync::Arc;
use uuid::Uuid;

use super::context::AssistantContext;
use super::handler::Flow;
use super::handlers::create_all_handlers;
use super::intent::{classify, Intent};
use super::registry::CommandRegistry;
use crate::core::RecognitionError;
use crate::features::greeting::{greeting_for_hour, INTRODUCTION};
use crate::services::{Sentiment, SentimentLabel};
use crate::speech::normalize_transcript;

pub const EMPTY_UTTERANCE: &str = "Please say something.";
pub const HANDLER_FAILED: &str = "Sorry, I couldn't process that.";
const POSITIVE_ACK: &str = "Great! How can I assist you today?";
const NEGATIVE_ACK: &str = "I'm here to help. What do you need assistance with?";

pub struct Router {
    ctx: Arc<AssistantContext>,
    registry: CommandRegistry,
}

impl Router {
    /// Router with every built-in handler registered
    pub fn new(ctx: Arc<AssistantContext>) -> Self {
        let mut registry = CommandRegistry::new();
        for handler in create_all_handlers() {
            registry.register(handler);
        }
        Self::with_registry(ctx, registry)
    }

    pub fn with_registry(ctx: Arc<AssistantContext>, registry: CommandRegistry) -> Self {
        Self { ctx, registry }
    }

    /// Greet, then handle utterances until exit or end of input
    pub async fn run(&self) {
        self.ctx.say(greeting_for_hour(Local::now().hour())).await;
        self.ctx.say(INTRODUCTION).await;

        loop {
            let utterance = match self.ctx.listen().await {
                Ok(utterance) => utterance,
                Err(RecognitionError::EndOfInput) => {
                    info!("Input closed, stopping");
                    break;
                }
                Err(e) => {
                    warn!("Unexpected recognition error: {e}");
                    continue;
                }
            };

            if self.dispatch(&utterance).await == Flow::Exit {
                break;
            }
        }

        let pending = self.ctx.reminders.pending().len();
        if pending > 0 {
            info!("Dropping {pending} pending reminder(s) on exit");
        }
        self.ctx.reminders.cancel_all();
    }

    /// Handle a single utterance
    pub async fn dispatch(&self, utterance: &str) -> Flow {
        let request_id = Uuid::new_v4();
        // Handlers extract slots from the same lowercased text that was classified
        let normalized = normalize_transcript(utterance);
        let utterance = normalized.as_str();

        let Some(intent) = classify(utterance) else {
            debug!("[{request_id}] Empty utterance");
            self.ctx.say(EMPTY_UTTERANCE).await;
            return Flow::Continue;
        };
        info!("[{request_id}] 📥 {utterance:?} → {intent}");

        self.acknowledge_sentiment(request_id, utterance).await;

        let Some(handler) = self.registry.get(intent) else {
            error!("[{request_id}] ❌ No handler registered for {intent}");
            self.ctx.say(HANDLER_FAILED).await;
            return Flow::Continue;
        };

        match handler.handle(self.ctx.clone(), intent, utterance).await {
            Ok(flow) => {
                debug!("[{request_id}] ✅ {intent} handled");
                flow
            }
            Err(e) => {
                error!("[{request_id}] ❌ {intent} handler failed: {e:#}");
                self.ctx.say(HANDLER_FAILED).await;
                Flow::Continue
            }
        }
    }

    /// Informational only: the reply never changes which intent runs
    async fn acknowledge_sentiment(&self, request_id: Uuid, utterance: &str) {
        let sentiment = match self
            .ctx
            .call("models", self.ctx.services.sentiment.classify(utterance))
            .await
        {
            Ok(sentiment) => sentiment,
            Err(e) => {
                debug!("[{request_id}] Sentiment unavailable, assuming neutral: {e}");
                Sentiment::neutral()
            }
        };
        debug!(
            "[{request_id}] Sentiment {:?} ({:.2})",
            sentiment.label, sentiment.confidence
        );

        match sentiment.label {
            SentimentLabel::Positive => self.ctx.say(POSITIVE_ACK).await,
            SentimentLabel::Negative => self.ctx.say(NEGATIVE_ACK).await,
            SentimentLabel::Neutral => {}
        }
    }

    pub fn handles(&self, intent: Intent) -> bool {
        self.registry.contains(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::handler::IntentHandler;
    use crate::commands::handlers::utility::GOODBYE;
    use crate::services::MusicAction;
    use crate::testing::{context_for, context_with, FakeModels, FakeServices};
    use anyhow::Result;
    use async_trait::async_trait;

    struct FailingHandler;

    #[async_trait]
    impl IntentHandler for FailingHandler {
        fn intents(&self) -> &'static [Intent] {
            &[Intent::News]
        }

        async fn handle(
            &self,
            _ctx: Arc<AssistantContext>,
            _intent: Intent,
            _utterance: &str,
        ) -> Result<Flow> {
            Err(anyhow::anyhow!("boom"))
        }
    }

    #[tokio::test]
    async fn test_empty_utterance_selects_nothing() {
        let (ctx, output) = context_for(&[], FakeServices::default());
        let router = Router::new(ctx);

        assert_eq!(router.dispatch("").await, Flow::Continue);
        assert_eq!(output.said(), vec![EMPTY_UTTERANCE]);
    }

    #[tokio::test]
    async fn test_time_utterance() {
        let (ctx, output) = context_for(&[], FakeServices::default());
        let router = Router::new(ctx);

        router.dispatch("what is the time").await;

        let said = output.said();
        assert_eq!(said.len(), 1);
        let clock = said[0].strip_prefix("The time is ").unwrap();
        assert_eq!(clock.len(), 8);
        assert!(clock.ends_with(" AM") || clock.ends_with(" PM"));
    }

    #[tokio::test]
    async fn test_handlers_receive_normalized_utterance() {
        let fakes = FakeServices::default();
        let (ctx, output) = context_for(&[], fakes.clone());
        let router = Router::new(ctx);

        router.dispatch("  Pause Music ").await;
        router.dispatch("Play Despacito").await;

        assert_eq!(
            output.said(),
            vec!["Pausing playback.", "Playing despacito on YouTube."]
        );
        assert_eq!(
            fakes.music.actions.lock().unwrap().as_slice(),
            [MusicAction::Pause]
        );
        assert_eq!(
            fakes.music.played.lock().unwrap().as_slice(),
            ["despacito".to_string()]
        );
    }

    #[tokio::test]
    async fn test_handler_error_is_contained() {
        let (ctx, output) = context_for(&[], FakeServices::default());
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(FailingHandler));
        let router = Router::with_registry(ctx, registry);

        assert_eq!(router.dispatch("news please").await, Flow::Continue);
        assert_eq!(output.said(), vec![HANDLER_FAILED]);
    }

    #[tokio::test]
    async fn test_unregistered_intent() {
        let (ctx, output) = context_for(&[], FakeServices::default());
        let router = Router::with_registry(ctx, CommandRegistry::new());

        assert!(!router.handles(Intent::Time));
        assert_eq!(router.dispatch("time").await, Flow::Continue);
        assert_eq!(output.said(), vec![HANDLER_FAILED]);
    }

    #[tokio::test]
    async fn test_sentiment_acknowledged_before_handling() {
        let fakes = FakeServices {
            models: Arc::new(FakeModels {
                sentiment: Some(Sentiment {
                    label: SentimentLabel::Negative,
                    confidence: 0.9,
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let (ctx, output) = context_for(&[], fakes);
        let router = Router::new(ctx);

        assert_eq!(router.dispatch("stop this").await, Flow::Exit);
        assert_eq!(output.said(), vec![NEGATIVE_ACK, GOODBYE]);
    }

    #[tokio::test]
    async fn test_run_until_exit() {
        let (ctx, output) = context_for(&["", "exit", "time"], FakeServices::default());
        let router = Router::new(ctx);

        router.run().await;

        let said = output.said();
        assert_eq!(said.len(), 4);
        assert_eq!(said[1], INTRODUCTION);
        assert_eq!(said[2], EMPTY_UTTERANCE);
        assert_eq!(said[3], GOODBYE);
    }

    #[tokio::test]
    async fn test_run_stops_at_end_of_input() {
        let (ctx, output) = context_with(
            vec![Err(RecognitionError::NotUnderstood)],
            FakeServices::default(),
        );
        let router = Router::new(ctx);

        router.run().await;

        let said = output.said();
        assert_eq!(said[2], "Sorry, I didn't get that. Please repeat.");
        assert_eq!(said[3], EMPTY_UTTERANCE);
        assert_eq!(said.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exit_drops_pending_reminders() {
        let (ctx, _output) = context_for(
            &["set reminder", "09:00 am", "stretch", "exit"],
            FakeServices::default(),
        );
        let router = Router::new(ctx.clone());

        router.run().await;

        assert!(ctx.reminders.pending().is_empty());
    }
}
