use anyhow::{Context, Result};
use dotenvy::dotenv;
use log::{info, warn};
use std::fs::OpenOptions;
use std::sync::Arc;
use std::time::Duration;

use concierge::commands::{AssistantContext, Router};
use concierge::core::{Config, InputMode, Settings};
use concierge::features::ReminderScheduler;
use concierge::services::{
    http_client, BingSearchClient, DesktopMusicPlayer, GmailClient, GoogleCalendarClient,
    Launcher, NewsApiClient, OpenAiModels, Services, SysfsBattery, SystemLauncher,
    WeatherApiClient, WhatsAppWeb, WikipediaClient,
};
use concierge::speech::{
    ConsoleInput, ConsoleOutput, SpeechInput, SpeechOutput, SpokenOutput, Transcriber, VoiceInput,
};

/// Headroom on top of the fixed-length recording for recorder start-up
const RECORD_GRACE: Duration = Duration::from_secs(10);

fn init_logging(config: &Config) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.log_level),
    );

    if let Some(path) = &config.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {path}"))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn build_services(config: &Config, settings: &Settings) -> Result<Services> {
    let timeout = settings.service_timeout();
    let client = http_client(timeout)?;
    let svc = &settings.services;

    let launcher: Arc<dyn Launcher> = Arc::new(SystemLauncher::new(
        settings
            .launcher_command
            .split_whitespace()
            .map(String::from)
            .collect(),
        timeout,
    ));

    let models = Arc::new(OpenAiModels::new(
        config.openai_model.clone(),
        config.openai_api_key.is_some(),
        settings.answers.summary_max_words,
    ));
    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY not set - answers, summaries and sentiment are disabled");
    }

    Ok(Services {
        weather: Arc::new(WeatherApiClient::new(
            client.clone(),
            &svc.weather_base_url,
            config.weather_api_key.clone(),
        )),
        news: Arc::new(NewsApiClient::new(
            client.clone(),
            &svc.news_base_url,
            config.news_api_key.clone(),
            svc.news_country.clone(),
        )),
        search: Arc::new(BingSearchClient::new(
            client.clone(),
            &svc.search_base_url,
            config.bing_search_api_key.clone(),
        )),
        calendar: Arc::new(GoogleCalendarClient::new(
            client.clone(),
            &svc.calendar_base_url,
            config.google_calendar_token.clone(),
            settings.calendar.time_zone.clone(),
            settings.calendar_offset(),
            settings.calendar.event_minutes,
        )),
        email: Arc::new(GmailClient::new(
            client.clone(),
            &svc.gmail_base_url,
            config.gmail_token.clone(),
        )),
        messaging: Arc::new(WhatsAppWeb::new(launcher.clone())),
        music: Arc::new(DesktopMusicPlayer::new(
            launcher.clone(),
            svc.music_controller.clone(),
            timeout,
        )),
        launcher,
        battery: Arc::new(SysfsBattery::default()),
        qa: models.clone(),
        summarizer: models.clone(),
        sentiment: models,
        knowledge: Arc::new(WikipediaClient::new(
            client,
            &svc.wikipedia_base_url,
            settings.answers.context_chars,
        )),
    })
}

fn build_output(settings: &Settings) -> Result<Arc<dyn SpeechOutput>> {
    if settings.speech.tts_command.is_empty() {
        info!("🔈 Replies printed to the console");
        return Ok(Arc::new(ConsoleOutput::new()));
    }
    info!("🔊 Replies spoken with {}", settings.speech.tts_command[0]);
    Ok(Arc::new(SpokenOutput::new(
        &settings.speech.tts_command,
        settings.speech.tts_rate,
    )?))
}

fn build_input(config: &Config, settings: &Settings) -> Result<Arc<dyn SpeechInput>> {
    match settings.input_mode {
        InputMode::Console => {
            info!("⌨️ Listening on stdin");
            Ok(Arc::new(ConsoleInput::new()))
        }
        InputMode::Voice => {
            let api_key = config
                .openai_api_key
                .clone()
                .context("Voice input needs OPENAI_API_KEY for transcription")?;
            let transcriber = Transcriber::new(
                api_key,
                settings.speech.transcription_url.clone(),
                settings.service_timeout(),
            );
            info!("🎙️ Listening on the microphone");
            Ok(Arc::new(VoiceInput::new(
                &settings.speech.record_command,
                settings.speech.recording_path.clone(),
                transcriber,
                settings.service_timeout() + RECORD_GRACE,
            )?))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    // The openai crate reads its key from the environment
    if let Some(key) = &config.openai_api_key {
        std::env::set_var("OPENAI_API_KEY", key);
        std::env::set_var("OPENAI_KEY", key);
    }

    init_logging(&config)?;

    info!("Starting concierge...");

    let settings = Settings::load_or_default(&config.settings_path)?;
    settings.validate()?;

    let services = build_services(&config, &settings)?;
    let output = build_output(&settings)?;
    let input = build_input(&config, &settings)?;

    let reminders = Arc::new(ReminderScheduler::new(output.clone()));
    let ctx = Arc::new(AssistantContext::new(
        input,
        output,
        services,
        reminders,
        Arc::new(settings),
    ));

    Router::new(ctx).run().await;

    info!("Concierge stopped");
    Ok(())
}
