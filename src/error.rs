//! Error types for the murmur agent

use thiserror::Error;

/// Result type alias for murmur operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the murmur agent
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio capture/playback error
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Interactive console error
    #[error("console error: {0}")]
    Console(String),

    /// Model runner error
    #[error("model error: {0}")]
    Model(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
