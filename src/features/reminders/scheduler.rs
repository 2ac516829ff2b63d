//! # Reminder Scheduler
//!
//! Time-of-day reminders held as in-flight tokio tasks. Nothing is persisted:
//! a reminder is gone once it fires, is cancelled, or the process exits.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 2.0.0: Handles with cancel/pending/cancel_all; spoken 12-hour times
//! - 1.0.0: Fire-and-forget delayed delivery

use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use dashmap::DashMap;
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::core::ValidationError;
use crate::speech::SpeechOutput;

/// A scheduled reminder as seen by callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderHandle {
    pub id: Uuid,
    pub fire_at: NaiveDateTime,
    pub message: String,
}

struct PendingReminder {
    handle: ReminderHandle,
    cancel: oneshot::Sender<()>,
}

/// Parse a spoken 12-hour time such as `09:00 AM`, `9:30 p.m.` or `11:15pm`
pub fn parse_reminder_time(spoken: &str) -> Result<NaiveTime, ValidationError> {
    let cleaned = spoken.to_uppercase().replace('.', "");
    let compact: String = cleaned.split_whitespace().collect();

    let Some(split) = compact.find(|c: char| c == 'A' || c == 'P') else {
        return Err(ValidationError::ReminderTime(spoken.to_string()));
    };
    let (clock, meridiem) = compact.split_at(split);
    let normalized = format!("{clock} {meridiem}");

    NaiveTime::parse_from_str(&normalized, "%I:%M %p")
        .map_err(|_| ValidationError::ReminderTime(spoken.to_string()))
}

/// Today at `time`, or the same time tomorrow if that has already passed
pub fn next_fire_time(now: NaiveDateTime, time: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(time);
    if today < now {
        today + Duration::hours(24)
    } else {
        today
    }
}

/// Schedules reminders and delivers them through the shared output
pub struct ReminderScheduler {
    output: Arc<dyn SpeechOutput>,
    pending: Arc<DashMap<Uuid, PendingReminder>>,
}

impl ReminderScheduler {
    pub fn new(output: Arc<dyn SpeechOutput>) -> Self {
        Self {
            output,
            pending: Arc::new(DashMap::new()),
        }
    }

    /// Schedule `message` for the next occurrence of `time_str` in local time
    pub fn schedule(&self, time_str: &str, message: &str) -> Result<ReminderHandle, ValidationError> {
        self.schedule_from(Local::now().naive_local(), time_str, message)
    }

    /// Schedule relative to an explicit `now`.
    ///
    /// The time is validated before anything is spawned, so an invalid time
    /// leaves no task behind.
    pub fn schedule_from(
        &self,
        now: NaiveDateTime,
        time_str: &str,
        message: &str,
    ) -> Result<ReminderHandle, ValidationError> {
        let time = parse_reminder_time(time_str)?;
        let fire_at = next_fire_time(now, time);
        let delay = (fire_at - now).to_std().unwrap_or_default();

        let handle = ReminderHandle {
            id: Uuid::new_v4(),
            fire_at,
            message: message.to_string(),
        };
        let (cancel, cancelled) = oneshot::channel();
        self.pending.insert(
            handle.id,
            PendingReminder {
                handle: handle.clone(),
                cancel,
            },
        );

        let id = handle.id;
        let text = format!("Reminder: {message}");
        let output = self.output.clone();
        let pending = self.pending.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    if pending.remove(&id).is_some() {
                        info!("Reminder {id} fired");
                        output.say(&text).await;
                    }
                }
                _ = cancelled => {
                    debug!("Reminder {id} cancelled");
                }
            }
        });

        info!("Reminder {id} scheduled for {fire_at} ({}s)", delay.as_secs());
        Ok(handle)
    }

    /// Cancel a pending reminder; `false` if it already fired or never existed
    pub fn cancel(&self, id: Uuid) -> bool {
        match self.pending.remove(&id) {
            Some((_, reminder)) => {
                let _ = reminder.cancel.send(());
                true
            }
            None => false,
        }
    }

    /// Reminders still waiting to fire, soonest first
    pub fn pending(&self) -> Vec<ReminderHandle> {
        let mut handles: Vec<ReminderHandle> = self
            .pending
            .iter()
            .map(|entry| entry.value().handle.clone())
            .collect();
        handles.sort_by_key(|h| h.fire_at);
        handles
    }

    /// Cancel everything, returning how many reminders were dropped
    pub fn cancel_all(&self) -> usize {
        let ids: Vec<Uuid> = self.pending.iter().map(|entry| *entry.key()).collect();
        ids.into_iter().filter(|id| self.cancel(*id)).count()
    }
}
