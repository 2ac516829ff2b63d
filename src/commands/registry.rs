//! Intent handler registry
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Keyed by [`Intent`] instead of command name
//! - 1.0.0: Initial implementation for handler dispatch

use std::collections::HashMap;
use std::sync::Arc;

use super::handler::IntentHandler;
use super::intent::Intent;

/// Registry mapping intents to handlers
///
/// Multiple intents can map to the same handler if they share logic.
///
/// # Example
///
/// ```ignore
/// let mut registry = CommandRegistry::new();
/// registry.register(Arc::new(UtilityHandler));
///
/// if let Some(handler) = registry.get(Intent::Time) {
///     handler.handle(ctx, Intent::Time, "what is the time").await?;
/// }
/// ```
#[derive(Clone)]
pub struct CommandRegistry {
    handlers: HashMap<Intent, Arc<dyn IntentHandler>>,
}

impl CommandRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for every intent it declares
    ///
    /// A later registration for the same intent replaces the earlier one.
    pub fn register(&mut self, handler: Arc<dyn IntentHandler>) {
        for intent in handler.intents() {
            self.handlers.insert(*intent, Arc::clone(&handler));
        }
    }

    pub fn get(&self, intent: Intent) -> Option<Arc<dyn IntentHandler>> {
        self.handlers.get(&intent).cloned()
    }

    pub fn contains(&self, intent: Intent) -> bool {
        self.handlers.contains_key(&intent)
    }

    /// Number of registered intents (not unique handlers)
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Intents with a handler
    pub fn intents(&self) -> impl Iterator<Item = &Intent> {
        self.handlers.keys()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
