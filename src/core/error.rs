//! Error kinds at each collaborator boundary
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//!
//! Handlers work in `anyhow::Result`; these enums are what the speech and
//! service seams return so a handler can tell "try again later" apart from
//! "say it differently".

use std::fmt::Display;
use std::time::Duration;
use thiserror::Error;

/// Failure to turn the user's speech into text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    #[error("speech was not understood")]
    NotUnderstood,
    #[error("recognition service unreachable: {0}")]
    Network(String),
    #[error("input stream closed")]
    EndOfInput,
}

/// Failure of an external service call.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{service} unavailable: {reason}")]
    Unavailable {
        service: &'static str,
        reason: String,
    },
    #[error("{service} timed out after {after:?}")]
    Timeout {
        service: &'static str,
        after: Duration,
    },
    #[error("{service} returned a malformed response: {reason}")]
    Malformed {
        service: &'static str,
        reason: String,
    },
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

impl ServiceError {
    pub fn unavailable(service: &'static str, reason: impl Display) -> Self {
        ServiceError::Unavailable {
            service,
            reason: reason.to_string(),
        }
    }

    pub fn malformed(service: &'static str, reason: impl Display) -> Self {
        ServiceError::Malformed {
            service,
            reason: reason.to_string(),
        }
    }

    /// Map a reqwest failure onto the closed set.
    pub fn from_http(service: &'static str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            ServiceError::malformed(service, err)
        } else {
            ServiceError::unavailable(service, err)
        }
    }

    /// Whether the same request might succeed if the user simply asks again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ServiceError::Unavailable { .. } | ServiceError::Timeout { .. }
        )
    }
}

/// User-supplied slot value that cannot be used.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("not a valid phone number: {0:?}")]
    PhoneNumber(String),
    #[error("not a valid reminder time (expected HH:MM AM/PM): {0:?}")]
    ReminderTime(String),
    #[error("not a valid event date (expected YYYY-MM-DD): {0:?}")]
    EventDate(String),
    #[error("not a valid event time (expected HH:MM): {0:?}")]
    EventTime(String),
    #[error("not a valid email address: {0:?}")]
    EmailAddress(String),
}
