//! # Core Module
//!
//! Configuration, error kinds and response shaping shared by every layer.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Add error module with per-boundary error kinds
//! - 1.1.0: Add YAML settings alongside environment config
//! - 1.0.0: Initial creation with config and response modules

pub mod config;
pub mod error;
pub mod response;
pub mod settings;

// Re-export commonly used items
pub use config::Config;
pub use error::{RecognitionError, ServiceError, ValidationError};
pub use response::{speech_segments, truncate_chars, truncate_words, SPEECH_SEGMENT_LIMIT};
pub use settings::{InputMode, Settings};
