//! Music playback: YouTube searches for songs, `playerctl` for transport
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: Play/pause/skip through the desktop media controller
//! - 1.0.0: Play a song by opening a YouTube search

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::launcher::{run_command, Launcher};
use crate::core::ServiceError;

const SERVICE: &str = "music";

const YOUTUBE_SEARCH_URL: &str = "https://www.youtube.com/results";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicAction {
    Play,
    Pause,
    Skip,
}

impl MusicAction {
    /// Pick the action named in a "play/pause/skip music" utterance
    pub fn from_utterance(utterance: &str) -> Option<Self> {
        if utterance.contains("pause music") {
            Some(MusicAction::Pause)
        } else if utterance.contains("skip music") {
            Some(MusicAction::Skip)
        } else if utterance.contains("play music") {
            Some(MusicAction::Play)
        } else {
            None
        }
    }

    /// Subcommand understood by `playerctl`
    pub fn controller_arg(self) -> &'static str {
        match self {
            MusicAction::Play => "play",
            MusicAction::Pause => "pause",
            MusicAction::Skip => "next",
        }
    }
}

#[async_trait]
pub trait MusicPlayer: Send + Sync {
    async fn play(&self, song: &str) -> Result<(), ServiceError>;
    async fn control(&self, action: MusicAction) -> Result<(), ServiceError>;
}

pub struct DesktopMusicPlayer {
    launcher: Arc<dyn Launcher>,
    controller: String,
    limit: Duration,
}

impl DesktopMusicPlayer {
    pub fn new(launcher: Arc<dyn Launcher>, controller: String, limit: Duration) -> Self {
        Self {
            launcher,
            controller,
            limit,
        }
    }
}

pub fn youtube_search_link(song: &str) -> Result<String, ServiceError> {
    reqwest::Url::parse_with_params(YOUTUBE_SEARCH_URL, &[("search_query", song)])
        .map(|url| url.to_string())
        .map_err(|e| ServiceError::malformed(SERVICE, e))
}

#[async_trait]
impl MusicPlayer for DesktopMusicPlayer {
    async fn play(&self, song: &str) -> Result<(), ServiceError> {
        let link = youtube_search_link(song)?;
        self.launcher.open_url(&link).await
    }

    async fn control(&self, action: MusicAction) -> Result<(), ServiceError> {
        run_command(
            SERVICE,
            &[self.controller.as_str(), action.controller_arg()],
            self.limit,
        )
        .await
        .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLauncher {
        opened: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Launcher for RecordingLauncher {
        async fn open_url(&self, url: &str) -> Result<(), ServiceError> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_action_from_utterance() {
        assert_eq!(MusicAction::from_utterance("please pause music"), Some(MusicAction::Pause));
        assert_eq!(MusicAction::from_utterance("skip music now"), Some(MusicAction::Skip));
        assert_eq!(MusicAction::from_utterance("play music"), Some(MusicAction::Play));
        assert_eq!(MusicAction::from_utterance("play despacito"), None);
    }

    #[test]
    fn test_controller_args() {
        assert_eq!(MusicAction::Skip.controller_arg(), "next");
        assert_eq!(MusicAction::Pause.controller_arg(), "pause");
    }

    #[tokio::test]
    async fn test_play_opens_youtube_search() {
        let launcher = Arc::new(RecordingLauncher::default());
        let player = DesktopMusicPlayer::new(
            launcher.clone(),
            "playerctl".to_string(),
            Duration::from_secs(5),
        );

        player.play("bohemian rhapsody").await.unwrap();

        assert_eq!(
            launcher.opened.lock().unwrap().as_slice(),
            ["https://www.youtube.com/results?search_query=bohemian+rhapsody"]
        );
    }

    #[tokio::test]
    async fn test_control_runs_controller() {
        let launcher = Arc::new(RecordingLauncher::default());
        let ok = DesktopMusicPlayer::new(launcher.clone(), "true".to_string(), Duration::from_secs(5));
        ok.control(MusicAction::Pause).await.unwrap();

        let failing = DesktopMusicPlayer::new(launcher, "false".to_string(), Duration::from_secs(5));
        assert!(failing.control(MusicAction::Skip).await.is_err());
    }
}
