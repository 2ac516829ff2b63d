//! # Command System
//!
//! Utterance classification, intent handlers and the main loop.
//!
//! - **Version**: 3.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 3.0.0: Ordered trigger table and intent-keyed registry
//! - 2.1.0: Add modular handler infrastructure (handler trait, context, registry)
//! - 1.0.0: Initial reorganization with modular command structure

pub mod context;
pub mod handler;
pub mod handlers;
pub mod intent;
pub mod registry;
pub mod router;

// Re-export handler infrastructure
pub use context::AssistantContext;
pub use handler::{Flow, IntentHandler};
pub use intent::{classify, Intent, INTENT_TRIGGERS};
pub use registry::CommandRegistry;
pub use router::Router;
