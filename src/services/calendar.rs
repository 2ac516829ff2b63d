//! Calendar events (Google Calendar REST API)
//!
//! Access tokens are issued outside this program and supplied through
//! `GOOGLE_CALENDAR_TOKEN`.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.5.0
//!
//! ## Changelog
//! - 1.1.0: Spoken date/time slots validated before any request is made
//! - 1.0.0: Insert event and list upcoming events

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use super::{base_url, fetch_json, require_key};
use crate::core::{ServiceError, ValidationError};

const SERVICE: &str = "calendar";

/// Upcoming events listed per request
pub const MAX_UPCOMING: usize = 10;

/// A validated event ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub start: NaiveDateTime,
}

impl NewEvent {
    /// Validate the three spoken slots of an "add event" request
    pub fn from_slots(title: &str, date: &str, time: &str) -> Result<Self, ValidationError> {
        let date = parse_event_date(date)?;
        let time = parse_event_time(time)?;
        Ok(Self {
            title: title.trim().to_string(),
            start: date.and_time(time),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingEvent {
    /// RFC 3339 date-time, or a bare date for all-day events
    pub start: String,
    pub summary: String,
}

#[async_trait]
pub trait CalendarProvider: Send + Sync {
    async fn add_event(&self, event: &NewEvent) -> Result<(), ServiceError>;
    /// Events from now on, ordered by start, at most `limit`
    async fn upcoming(&self, limit: usize) -> Result<Vec<UpcomingEvent>, ServiceError>;
}

/// Parse a spoken `YYYY-MM-DD` date; spaces or slashes are accepted as separators
pub fn parse_event_date(spoken: &str) -> Result<NaiveDate, ValidationError> {
    let cleaned: String = spoken
        .trim()
        .split(|c: char| c == ' ' || c == '/' || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    NaiveDate::parse_from_str(&cleaned, "%Y-%m-%d")
        .map_err(|_| ValidationError::EventDate(spoken.to_string()))
}

/// Parse a spoken `HH:MM` time (24-hour), falling back to `HH:MM AM/PM`
pub fn parse_event_time(spoken: &str) -> Result<NaiveTime, ValidationError> {
    let trimmed = spoken.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .ok()
        .or_else(|| crate::features::reminders::parse_reminder_time(trimmed).ok())
        .ok_or_else(|| ValidationError::EventTime(spoken.to_string()))
}

/// Sort upcoming events chronologically and keep the first `limit`
pub fn order_upcoming(mut events: Vec<UpcomingEvent>, limit: usize) -> Vec<UpcomingEvent> {
    events.sort_by_key(|e| start_timestamp(&e.start));
    events.truncate(limit);
    events
}

fn start_timestamp(start: &str) -> i64 {
    if let Ok(dt) = DateTime::parse_from_rfc3339(start) {
        return dt.timestamp();
    }
    NaiveDate::parse_from_str(start, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or(i64::MAX)
}

#[derive(Serialize)]
struct EventBody<'a> {
    summary: &'a str,
    start: EventTime<'a>,
    end: EventTime<'a>,
}

#[derive(Serialize)]
struct EventTime<'a> {
    #[serde(rename = "dateTime")]
    date_time: String,
    #[serde(rename = "timeZone")]
    time_zone: &'a str,
}

#[derive(Deserialize)]
struct InsertedEvent {
    #[serde(default)]
    id: String,
}

#[derive(Deserialize)]
struct EventList {
    #[serde(default)]
    items: Vec<EventItem>,
}

#[derive(Deserialize)]
struct EventItem {
    summary: Option<String>,
    start: EventStart,
}

#[derive(Deserialize)]
struct EventStart {
    #[serde(rename = "dateTime")]
    date_time: Option<String>,
    date: Option<String>,
}

pub struct GoogleCalendarClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    time_zone: String,
    offset: FixedOffset,
    event_length: Duration,
}

impl GoogleCalendarClient {
    pub fn new(
        client: reqwest::Client,
        base: &str,
        token: Option<String>,
        time_zone: String,
        offset: FixedOffset,
        event_minutes: u32,
    ) -> Self {
        Self {
            client,
            base_url: base_url(base),
            token,
            time_zone,
            offset,
            event_length: Duration::minutes(i64::from(event_minutes)),
        }
    }

    fn rfc3339(&self, local: NaiveDateTime) -> String {
        local
            .and_local_timezone(self.offset)
            .single()
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| format!("{}{}", local.format("%Y-%m-%dT%H:%M:%S"), self.offset))
    }

    fn events_url(&self) -> String {
        format!("{}/calendar/v3/calendars/primary/events", self.base_url)
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendarClient {
    async fn add_event(&self, event: &NewEvent) -> Result<(), ServiceError> {
        let token = require_key(SERVICE, &self.token)?;

        let body = EventBody {
            summary: &event.title,
            start: EventTime {
                date_time: self.rfc3339(event.start),
                time_zone: &self.time_zone,
            },
            end: EventTime {
                date_time: self.rfc3339(event.start + self.event_length),
                time_zone: &self.time_zone,
            },
        };

        let request = self.client.post(self.events_url()).bearer_auth(token).json(&body);
        let inserted: InsertedEvent = fetch_json(SERVICE, request).await?;
        debug!("Inserted calendar event {}", inserted.id);
        Ok(())
    }

    async fn upcoming(&self, limit: usize) -> Result<Vec<UpcomingEvent>, ServiceError> {
        let token = require_key(SERVICE, &self.token)?;

        let time_min = Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        let max_results = limit.to_string();
        let request = self
            .client
            .get(self.events_url())
            .bearer_auth(token)
            .query(&[
                ("timeMin", time_min.as_str()),
                ("maxResults", max_results.as_str()),
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
            ]);
        let list: EventList = fetch_json(SERVICE, request).await?;

        let events = list
            .items
            .into_iter()
            .filter_map(|item| {
                let start = item.start.date_time.or(item.start.date)?;
                Some(UpcomingEvent {
                    start,
                    summary: item.summary.unwrap_or_else(|| "(no title)".to_string()),
                })
            })
            .collect();
        Ok(order_upcoming(events, limit))
    }
}

/// Spoken listing of upcoming events
pub fn describe_upcoming(events: &[UpcomingEvent]) -> String {
    if events.is_empty() {
        return "No upcoming events found.".to_string();
    }
    let lines: Vec<String> = events
        .iter()
        .map(|e| format!("{} - {}", e.start, e.summary))
        .collect();
    format!("Upcoming events:\n{}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GoogleCalendarClient {
        GoogleCalendarClient::new(
            crate::services::http_client(std::time::Duration::from_secs(5)).unwrap(),
            &server.uri(),
            Some("cal-token".to_string()),
            "Asia/Kolkata".to_string(),
            "+05:30".parse().unwrap(),
            30,
        )
    }

    #[test]
    fn test_parse_event_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        assert_eq!(parse_event_date("2024-12-25").unwrap(), expected);
        assert_eq!(parse_event_date("2024 12 25").unwrap(), expected);
        assert_eq!(parse_event_date(" 2024/12/25 ").unwrap(), expected);
        assert!(matches!(
            parse_event_date("next tuesday"),
            Err(ValidationError::EventDate(_))
        ));
    }

    #[test]
    fn test_parse_event_time() {
        let expected = NaiveTime::from_hms_opt(14, 30, 0).unwrap();
        assert_eq!(parse_event_time("14:30").unwrap(), expected);
        assert_eq!(parse_event_time("02:30 pm").unwrap(), expected);
        assert!(matches!(
            parse_event_time("half past"),
            Err(ValidationError::EventTime(_))
        ));
    }

    #[test]
    fn test_from_slots() {
        let event = NewEvent::from_slots(" dentist ", "2024-12-25", "09:15").unwrap();
        assert_eq!(event.title, "dentist");
        assert_eq!(event.start.format("%Y-%m-%d %H:%M").to_string(), "2024-12-25 09:15");
    }

    #[test]
    fn test_order_upcoming_sorts_and_caps() {
        let events = vec![
            UpcomingEvent {
                start: "2024-06-02T10:00:00+05:30".to_string(),
                summary: "later".to_string(),
            },
            UpcomingEvent {
                start: "2024-06-01".to_string(),
                summary: "all day".to_string(),
            },
            UpcomingEvent {
                start: "2024-06-01T09:00:00Z".to_string(),
                summary: "morning".to_string(),
            },
        ];
        let ordered = order_upcoming(events, 2);
        let summaries: Vec<_> = ordered.iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(summaries, vec!["all day", "morning"]);
    }

    #[test]
    fn test_describe_upcoming() {
        assert_eq!(describe_upcoming(&[]), "No upcoming events found.");
        let text = describe_upcoming(&[UpcomingEvent {
            start: "2024-06-01T09:00:00Z".to_string(),
            summary: "standup".to_string(),
        }]);
        assert_eq!(text, "Upcoming events:\n2024-06-01T09:00:00Z - standup");
    }

    #[tokio::test]
    async fn test_add_event_posts_start_and_end() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/calendar/v3/calendars/primary/events"))
            .and(header("authorization", "Bearer cal-token"))
            .and(body_partial_json(json!({
                "summary": "dentist",
                "start": {"dateTime": "2024-12-25T09:15:00+05:30", "timeZone": "Asia/Kolkata"},
                "end": {"dateTime": "2024-12-25T09:45:00+05:30", "timeZone": "Asia/Kolkata"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "evt1"})))
            .expect(1)
            .mount(&server)
            .await;

        let event = NewEvent::from_slots("dentist", "2024-12-25", "09:15").unwrap();
        client_for(&server).add_event(&event).await.unwrap();
    }

    #[tokio::test]
    async fn test_upcoming_events() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendar/v3/calendars/primary/events"))
            .and(query_param("orderBy", "startTime"))
            .and(query_param("maxResults", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"summary": "review", "start": {"dateTime": "2024-06-03T15:00:00Z"}},
                    {"summary": "holiday", "start": {"date": "2024-06-02"}},
                    {"start": {"dateTime": "2024-06-04T08:00:00Z"}}
                ]
            })))
            .mount(&server)
            .await;

        let events = client_for(&server).upcoming(MAX_UPCOMING).await.unwrap();
        let summaries: Vec<_> = events.iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(summaries, vec!["holiday", "review", "(no title)"]);
    }

    #[tokio::test]
    async fn test_unauthorized_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client_for(&server).upcoming(MAX_UPCOMING).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unavailable { .. }));
    }
}
