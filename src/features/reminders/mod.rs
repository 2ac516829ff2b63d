//! # Reminders Feature
//!
//! Spoken time-of-day reminders delivered through the shared output channel.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod scheduler;

pub use scheduler::{next_fire_time, parse_reminder_time, ReminderHandle, ReminderScheduler};
