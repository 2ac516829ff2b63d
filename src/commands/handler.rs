//! Intent handler trait and infrastructure
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Handlers keyed by intent and return a loop [`Flow`]
//! - 1.0.0: Initial implementation for modular command handling

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use super::context::AssistantContext;
use super::intent::Intent;

/// What the main loop does after an utterance has been handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Trait for intent handlers
///
/// Each handler processes one or more intents. Handlers that need extra
/// slots ask for them inline through [`AssistantContext::ask`]; the router
/// does not read another utterance until `handle` returns.
///
/// # Example
///
/// ```ignore
/// pub struct TimeHandler;
///
/// #[async_trait]
/// impl IntentHandler for TimeHandler {
///     fn intents(&self) -> &'static [Intent] {
///         &[Intent::Time]
///     }
///
///     async fn handle(
///         &self,
///         ctx: Arc<AssistantContext>,
///         intent: Intent,
///         utterance: &str,
///     ) -> Result<Flow> {
///         ctx.say("The time is 09:00 AM").await;
///         Ok(Flow::Continue)
///     }
/// }
/// ```
#[async_trait]
pub trait IntentHandler: Send + Sync {
    /// Intent(s) this handler processes
    fn intents(&self) -> &'static [Intent];

    /// Handle one utterance already classified as `intent`
    ///
    /// An `Err` is logged by the router and answered with a generic apology.
    async fn handle(
        &self,
        ctx: Arc<AssistantContext>,
        intent: Intent,
        utterance: &str,
    ) -> Result<Flow>;
}
