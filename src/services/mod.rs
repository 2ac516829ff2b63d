//! # External Services
//!
//! One trait per collaborator category plus its production client. Handlers
//! only ever see the traits, bundled in [`Services`].
//!
//! - **Version**: 1.3.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.3.0: Bounded timeout around every call (`with_timeout`)
//! - 1.2.0: Calendar, email and messaging providers
//! - 1.1.0: Encyclopedia context for question answering
//! - 1.0.0: Weather, news, search, models

pub mod battery;
pub mod calendar;
pub mod email;
pub mod knowledge;
pub mod launcher;
pub mod messaging;
pub mod models;
pub mod music;
pub mod news;
pub mod search;
pub mod weather;

use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::core::ServiceError;

pub use battery::{BatteryProbe, BatteryStatus, SysfsBattery};
pub use calendar::{CalendarProvider, GoogleCalendarClient, NewEvent, UpcomingEvent};
pub use email::{EmailAddress, EmailProvider, GmailClient};
pub use knowledge::{KnowledgeSource, WikipediaClient};
pub use launcher::{Launcher, SystemLauncher};
pub use messaging::{MessagingProvider, PhoneNumber, WhatsAppWeb};
pub use models::{
    OpenAiModels, QuestionAnswering, Sentiment, SentimentClassifier, SentimentLabel, Summarizer,
};
pub use music::{DesktopMusicPlayer, MusicAction, MusicPlayer};
pub use news::{Article, NewsApiClient, NewsProvider};
pub use search::{BingSearchClient, SearchProvider, SearchResult};
pub use weather::{CurrentWeather, ForecastDay, WeatherApiClient, WeatherProvider};

/// User agent sent to every HTTP provider
pub const USER_AGENT: &str = concat!("concierge/", env!("CARGO_PKG_VERSION"));

/// Every collaborator handle the handlers may call
#[derive(Clone)]
pub struct Services {
    pub weather: Arc<dyn WeatherProvider>,
    pub news: Arc<dyn NewsProvider>,
    pub search: Arc<dyn SearchProvider>,
    pub calendar: Arc<dyn CalendarProvider>,
    pub email: Arc<dyn EmailProvider>,
    pub messaging: Arc<dyn MessagingProvider>,
    pub music: Arc<dyn MusicPlayer>,
    pub launcher: Arc<dyn Launcher>,
    pub battery: Arc<dyn BatteryProbe>,
    pub qa: Arc<dyn QuestionAnswering>,
    pub summarizer: Arc<dyn Summarizer>,
    pub sentiment: Arc<dyn SentimentClassifier>,
    pub knowledge: Arc<dyn KnowledgeSource>,
}

/// Build the shared HTTP client with a per-request timeout
pub fn http_client(request_timeout: Duration) -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(request_timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Run a service call, giving up after `limit`
pub async fn with_timeout<T, F>(
    service: &'static str,
    limit: Duration,
    call: F,
) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ServiceError::Timeout {
            service,
            after: limit,
        }),
    }
}

/// Send a request and decode a JSON body, mapping failures onto [`ServiceError`]
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    service: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<T, ServiceError> {
    let response = request
        .send()
        .await
        .map_err(|e| ServiceError::from_http(service, e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ServiceError::unavailable(
            service,
            format!("HTTP {status}: {}", crate::core::truncate_chars(&body, 200)),
        ));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ServiceError::malformed(service, e))
}

/// Require an API key, or report the service as not configured
pub(crate) fn require_key<'a>(
    service: &'static str,
    key: &'a Option<String>,
) -> Result<&'a str, ServiceError> {
    key.as_deref().ok_or(ServiceError::NotConfigured(service))
}

/// Trim a configured base URL so paths can be appended with `/`
pub(crate) fn base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
