//! Per-intent handler implementations
//!
//! - **Version**: 3.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 3.0.0: Voice intents (weather, info, media, messaging, calendar)
//! - 2.0.0: Fallback questions consolidated into AskHandler
//! - 1.0.0: Initial extraction from the monolithic command loop

pub mod ask;
pub mod calendar;
pub mod info;
pub mod media;
pub mod messaging;
pub mod remind;
pub mod utility;
pub mod weather;

use std::sync::Arc;

use super::handler::IntentHandler;

/// Create all registered intent handlers
///
/// Together they cover every [`Intent`](super::Intent), fallback included.
pub fn create_all_handlers() -> Vec<Arc<dyn IntentHandler>> {
    vec![
        Arc::new(utility::UtilityHandler),
        Arc::new(media::MediaHandler),
        Arc::new(weather::WeatherHandler),
        Arc::new(info::InfoHandler),
        Arc::new(remind::RemindHandler),
        Arc::new(messaging::MessagingHandler),
        Arc::new(calendar::CalendarHandler),
        Arc::new(ask::AskHandler),
    ]
}
