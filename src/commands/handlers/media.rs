//! Media intent handlers
//!
//! Handles: play, music_control, open
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: Play/pause/skip controls
//! - 1.0.0: Play songs and open websites

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{error, info};
use std::sync::Arc;

use crate::commands::context::AssistantContext;
use crate::commands::handler::{Flow, IntentHandler};
use crate::commands::intent::Intent;
use crate::services::MusicAction;

/// Handler for media intents: play, music_control, open
pub struct MediaHandler;

#[async_trait]
impl IntentHandler for MediaHandler {
    fn intents(&self) -> &'static [Intent] {
        &[Intent::Play, Intent::MusicControl, Intent::Open]
    }

    async fn handle(
        &self,
        ctx: Arc<AssistantContext>,
        intent: Intent,
        utterance: &str,
    ) -> Result<Flow> {
        match intent {
            Intent::Play => self.handle_play(&ctx, utterance).await?,
            Intent::MusicControl => self.handle_music_control(&ctx, utterance).await,
            Intent::Open => self.handle_open(&ctx, utterance).await?,
            _ => {}
        }
        Ok(Flow::Continue)
    }
}

impl MediaHandler {
    async fn handle_play(&self, ctx: &AssistantContext, utterance: &str) -> Result<()> {
        let song = strip_keyword(utterance, "play");
        if song.is_empty() {
            ctx.say("Please specify a song to play.").await;
            return Ok(());
        }

        ctx.say(&format!("Playing {song} on YouTube.")).await;
        ctx.call("music", ctx.services.music.play(&song))
            .await
            .with_context(|| format!("Failed to play {song:?}"))?;
        info!("Playing {song:?}");
        Ok(())
    }

    async fn handle_music_control(&self, ctx: &AssistantContext, utterance: &str) {
        let Some(action) = MusicAction::from_utterance(utterance) else {
            ctx.say("I didn't understand that music control command.").await;
            return;
        };

        match ctx.call("music", ctx.services.music.control(action)).await {
            Ok(()) => {
                let reply = match action {
                    MusicAction::Play => "Resuming playback.",
                    MusicAction::Pause => "Pausing playback.",
                    MusicAction::Skip => "Skipping to the next track.",
                };
                ctx.say(reply).await;
            }
            Err(e) => {
                error!("Music control error: {e}");
                ctx.say("Sorry, I couldn't control the music.").await;
            }
        }
    }

    async fn handle_open(&self, ctx: &AssistantContext, utterance: &str) -> Result<()> {
        let website = strip_keyword(utterance, "open");
        if website.is_empty() {
            ctx.say("Please specify a website to open.").await;
            return Ok(());
        }

        let url = website_url(&website);
        ctx.say(&format!("Opening {website}.")).await;
        ctx.call("launcher", ctx.services.launcher.open_url(&url))
            .await
            .with_context(|| format!("Failed to open {url}"))?;
        Ok(())
    }
}

/// Remove every occurrence of `keyword` and trim what is left
pub fn strip_keyword(utterance: &str, keyword: &str) -> String {
    utterance.replace(keyword, "").trim().to_string()
}

/// `https://{name}.com` with spaces removed
pub fn website_url(name: &str) -> String {
    let host: String = name
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    format!("https://{host}.com")
}
