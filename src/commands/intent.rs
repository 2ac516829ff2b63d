//! Intent classification by ordered trigger substrings
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Multi-word triggers ordered ahead of their single-word prefixes
//! - 1.0.0: Initial trigger table

use std::fmt;

/// Every action the assistant can take for an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Time,
    MusicControl,
    Play,
    WeatherForecast,
    Weather,
    News,
    Battery,
    SetReminder,
    WhatsApp,
    Open,
    Search,
    AddEvent,
    UpcomingEvents,
    SendEmail,
    CheckEmails,
    Exit,
    Fallback,
}

/// Trigger table in priority order; the first entry with a trigger contained
/// in the utterance wins.
///
/// "weather forecast" sits above "weather" and the music controls above
/// "play", otherwise the longer phrases could never be selected.
pub const INTENT_TRIGGERS: &[(Intent, &[&str])] = &[
    (Intent::Time, &["time"]),
    (
        Intent::MusicControl,
        &["play music", "pause music", "skip music"],
    ),
    (Intent::Play, &["play"]),
    (Intent::WeatherForecast, &["weather forecast"]),
    (Intent::Weather, &["weather"]),
    (Intent::News, &["news"]),
    (Intent::Battery, &["battery"]),
    (Intent::SetReminder, &["set reminder"]),
    (Intent::WhatsApp, &["send whatsapp", "whatsapp message"]),
    (Intent::Open, &["open"]),
    (Intent::Search, &["search"]),
    (Intent::AddEvent, &["add event"]),
    (Intent::UpcomingEvents, &["upcoming events"]),
    (Intent::SendEmail, &["send email"]),
    (Intent::CheckEmails, &["check emails"]),
    (Intent::Exit, &["exit", "stop"]),
];

impl Intent {
    pub fn name(self) -> &'static str {
        match self {
            Intent::Time => "time",
            Intent::MusicControl => "music_control",
            Intent::Play => "play",
            Intent::WeatherForecast => "weather_forecast",
            Intent::Weather => "weather",
            Intent::News => "news",
            Intent::Battery => "battery",
            Intent::SetReminder => "set_reminder",
            Intent::WhatsApp => "whatsapp",
            Intent::Open => "open",
            Intent::Search => "search",
            Intent::AddEvent => "add_event",
            Intent::UpcomingEvents => "upcoming_events",
            Intent::SendEmail => "send_email",
            Intent::CheckEmails => "check_emails",
            Intent::Exit => "exit",
            Intent::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify an utterance.
///
/// Returns `None` for an empty or whitespace-only utterance, which selects
/// no intent at all. Matching is on the lowercased text.
pub fn classify(utterance: &str) -> Option<Intent> {
    let text = utterance.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }

    let intent = INTENT_TRIGGERS
        .iter()
        .find(|(_, triggers)| triggers.iter().any(|t| text.contains(t)))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::Fallback);
    Some(intent)
}
