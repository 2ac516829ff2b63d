//! Scripted collaborators for handler and router tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::commands::AssistantContext;
use crate::core::{RecognitionError, ServiceError, Settings};
use crate::features::reminders::ReminderScheduler;
use crate::services::{
    Article, BatteryProbe, BatteryStatus, CalendarProvider, CurrentWeather, EmailAddress,
    EmailProvider, ForecastDay, KnowledgeSource, Launcher, MessagingProvider, MusicAction,
    MusicPlayer, NewEvent, NewsProvider, PhoneNumber, QuestionAnswering, SearchProvider,
    SearchResult, Sentiment, SentimentClassifier, Services, Summarizer, UpcomingEvent,
    WeatherProvider,
};
use crate::speech::{SpeechInput, SpeechOutput};

fn scripted_failure(service: &'static str) -> ServiceError {
    ServiceError::unavailable(service, "scripted failure")
}

/// Records everything said, in order
#[derive(Default)]
pub struct RecordingOutput {
    lines: Mutex<Vec<String>>,
}

impl RecordingOutput {
    pub fn said(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechOutput for RecordingOutput {
    async fn say(&self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }
}

/// Replays a fixed script of utterances, then reports end of input
pub struct ScriptedInput {
    script: Mutex<VecDeque<Result<String, RecognitionError>>>,
}

impl ScriptedInput {
    pub fn new(script: Vec<Result<String, RecognitionError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }
}

#[async_trait]
impl SpeechInput for ScriptedInput {
    async fn listen(&self) -> Result<String, RecognitionError> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(RecognitionError::EndOfInput))
    }
}

/// Answers with one line after a delay, like a user slow to reply
pub struct DelayedInput {
    delay: Duration,
    line: String,
}

impl DelayedInput {
    pub fn new(delay: Duration, line: &str) -> Self {
        Self {
            delay,
            line: line.to_string(),
        }
    }
}

#[async_trait]
impl SpeechInput for DelayedInput {
    async fn listen(&self) -> Result<String, RecognitionError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.line.clone())
    }
}

#[derive(Default)]
pub struct FakeWeather {
    pub current: Option<CurrentWeather>,
    pub forecast: Option<Vec<ForecastDay>>,
    pub cities: Mutex<Vec<String>>,
}

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn current(&self, city: &str) -> Result<CurrentWeather, ServiceError> {
        self.cities.lock().unwrap().push(city.to_string());
        self.current.clone().ok_or_else(|| scripted_failure("weather"))
    }

    async fn forecast(&self, city: &str, _days: u32) -> Result<Vec<ForecastDay>, ServiceError> {
        self.cities.lock().unwrap().push(city.to_string());
        self.forecast.clone().ok_or_else(|| scripted_failure("weather"))
    }
}

#[derive(Default)]
pub struct FakeNews {
    pub headlines: Option<Vec<Article>>,
}

#[async_trait]
impl NewsProvider for FakeNews {
    async fn top_headlines(&self) -> Result<Vec<Article>, ServiceError> {
        self.headlines.clone().ok_or_else(|| scripted_failure("news"))
    }
}

#[derive(Default)]
pub struct FakeSearch {
    pub results: Option<Vec<SearchResult>>,
    pub queries: Mutex<Vec<String>>,
}

#[async_trait]
impl SearchProvider for FakeSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ServiceError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.results.clone().ok_or_else(|| scripted_failure("search"))
    }
}

#[derive(Default)]
pub struct FakeCalendar {
    pub fail: bool,
    pub upcoming: Vec<UpcomingEvent>,
    pub added: Mutex<Vec<NewEvent>>,
}

#[async_trait]
impl CalendarProvider for FakeCalendar {
    async fn add_event(&self, event: &NewEvent) -> Result<(), ServiceError> {
        if self.fail {
            return Err(scripted_failure("calendar"));
        }
        self.added.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn upcoming(&self, limit: usize) -> Result<Vec<UpcomingEvent>, ServiceError> {
        if self.fail {
            return Err(scripted_failure("calendar"));
        }
        Ok(self.upcoming.iter().take(limit).cloned().collect())
    }
}

#[derive(Default)]
pub struct FakeEmail {
    pub fail: bool,
    pub unread: usize,
    pub sent: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl EmailProvider for FakeEmail {
    async fn send(&self, to: &EmailAddress, subject: &str, body: &str) -> Result<(), ServiceError> {
        if self.fail {
            return Err(scripted_failure("email"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }

    async fn unread_count(&self) -> Result<usize, ServiceError> {
        if self.fail {
            return Err(scripted_failure("email"));
        }
        Ok(self.unread)
    }
}

#[derive(Default)]
pub struct FakeMessaging {
    pub fail: bool,
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl MessagingProvider for FakeMessaging {
    async fn send_instant(&self, to: &PhoneNumber, message: &str) -> Result<(), ServiceError> {
        if self.fail {
            return Err(scripted_failure("messaging"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), message.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeMusic {
    pub fail: bool,
    pub played: Mutex<Vec<String>>,
    pub actions: Mutex<Vec<MusicAction>>,
}

#[async_trait]
impl MusicPlayer for FakeMusic {
    async fn play(&self, song: &str) -> Result<(), ServiceError> {
        if self.fail {
            return Err(scripted_failure("music"));
        }
        self.played.lock().unwrap().push(song.to_string());
        Ok(())
    }

    async fn control(&self, action: MusicAction) -> Result<(), ServiceError> {
        if self.fail {
            return Err(scripted_failure("music"));
        }
        self.actions.lock().unwrap().push(action);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeLauncher {
    pub fail: bool,
    pub opened: Mutex<Vec<String>>,
}

#[async_trait]
impl Launcher for FakeLauncher {
    async fn open_url(&self, url: &str) -> Result<(), ServiceError> {
        if self.fail {
            return Err(scripted_failure("launcher"));
        }
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeBattery {
    pub status: Option<BatteryStatus>,
}

#[async_trait]
impl BatteryProbe for FakeBattery {
    async fn query(&self) -> Option<BatteryStatus> {
        self.status
    }
}

/// Question answering, summarization and sentiment; `None` fails the call
#[derive(Default)]
pub struct FakeModels {
    pub answer: Option<String>,
    pub summary: Option<String>,
    pub sentiment: Option<Sentiment>,
    pub questions: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl QuestionAnswering for FakeModels {
    async fn answer(&self, question: &str, context: &str) -> Result<String, ServiceError> {
        self.questions
            .lock()
            .unwrap()
            .push((question.to_string(), context.to_string()));
        self.answer.clone().ok_or_else(|| scripted_failure("models"))
    }
}

#[async_trait]
impl Summarizer for FakeModels {
    async fn summarize(&self, _text: &str) -> Result<String, ServiceError> {
        self.summary.clone().ok_or_else(|| scripted_failure("models"))
    }
}

#[async_trait]
impl SentimentClassifier for FakeModels {
    async fn classify(&self, _text: &str) -> Result<Sentiment, ServiceError> {
        self.sentiment.ok_or_else(|| scripted_failure("models"))
    }
}

#[derive(Default)]
pub struct FakeKnowledge {
    pub fail: bool,
    pub context: Option<String>,
}

#[async_trait]
impl KnowledgeSource for FakeKnowledge {
    async fn lookup(&self, _question: &str) -> Result<Option<String>, ServiceError> {
        if self.fail {
            return Err(scripted_failure("knowledge"));
        }
        Ok(self.context.clone())
    }
}

/// One fake per collaborator; keep a clone to inspect calls afterwards
#[derive(Clone, Default)]
pub struct FakeServices {
    pub weather: Arc<FakeWeather>,
    pub news: Arc<FakeNews>,
    pub search: Arc<FakeSearch>,
    pub calendar: Arc<FakeCalendar>,
    pub email: Arc<FakeEmail>,
    pub messaging: Arc<FakeMessaging>,
    pub music: Arc<FakeMusic>,
    pub launcher: Arc<FakeLauncher>,
    pub battery: Arc<FakeBattery>,
    pub models: Arc<FakeModels>,
    pub knowledge: Arc<FakeKnowledge>,
}

impl FakeServices {
    pub fn services(&self) -> Services {
        Services {
            weather: self.weather.clone(),
            news: self.news.clone(),
            search: self.search.clone(),
            calendar: self.calendar.clone(),
            email: self.email.clone(),
            messaging: self.messaging.clone(),
            music: self.music.clone(),
            launcher: self.launcher.clone(),
            battery: self.battery.clone(),
            qa: self.models.clone(),
            summarizer: self.models.clone(),
            sentiment: self.models.clone(),
            knowledge: self.knowledge.clone(),
        }
    }
}

/// Context over a scripted input and a recording output, with default settings
pub fn context_with(
    script: Vec<Result<String, RecognitionError>>,
    fakes: FakeServices,
) -> (Arc<AssistantContext>, Arc<RecordingOutput>) {
    context_with_input(Arc::new(ScriptedInput::new(script)), fakes)
}

/// Context over any input; reminders speak on the same recording output
pub fn context_with_input(
    input: Arc<dyn SpeechInput>,
    fakes: FakeServices,
) -> (Arc<AssistantContext>, Arc<RecordingOutput>) {
    let output = Arc::new(RecordingOutput::default());
    let reminders = Arc::new(ReminderScheduler::new(output.clone()));
    let ctx = AssistantContext::new(
        input,
        output.clone(),
        fakes.services(),
        reminders,
        Arc::new(Settings::default()),
    );
    (Arc::new(ctx), output)
}

/// [`context_with`] for a script of plain lines
pub fn context_for(lines: &[&str], fakes: FakeServices) -> (Arc<AssistantContext>, Arc<RecordingOutput>) {
    context_with(lines.iter().map(|l| Ok(l.to_string())).collect(), fakes)
}
