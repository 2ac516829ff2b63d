//! # Features
//!
//! Self-contained behaviour that sits beside the command router.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Reminders reworked around time-of-day scheduling; greeting added

pub mod greeting;
pub mod reminders;

pub use greeting::{greeting_for_hour, INTRODUCTION};
pub use reminders::{ReminderHandle, ReminderScheduler};
