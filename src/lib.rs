// Core layer - shared types and configuration
pub mod core;

// Speech layer - utterances in, replies out
pub mod speech;

// Services layer - external collaborators behind traits
pub mod services;

// Features layer - reminders and greetings
pub mod features;

// Application layer - intent routing and handlers
pub mod commands;

// In-memory collaborators shared by unit tests
#[cfg(test)]
pub(crate) mod testing;

// Re-export core config for backwards compatibility
pub use core::{Config, Settings};

pub use commands::{AssistantContext, Router};
pub use features::ReminderScheduler;
