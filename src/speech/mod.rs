//! # Speech Layer
//!
//! Input and output channels for utterances. Everything behind these traits
//! (microphone, Whisper, TTS programs) is an external collaborator.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add Whisper transcriber and voice input
//! - 1.0.0: Console input/output and TTS output

pub mod input;
pub mod output;
pub mod transcriber;

pub use input::{normalize_transcript, ConsoleInput, SpeechInput, VoiceInput};
pub use output::{ConsoleOutput, SpeechOutput, SpokenOutput};
pub use transcriber::Transcriber;
