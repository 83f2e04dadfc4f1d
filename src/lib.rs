//! Murmur - Voice and text chat agent for locally-run language models
//!
//! This library provides the core functionality for the murmur agent:
//! - Per-turn input acquisition (microphone with activation phrase, or keyboard)
//! - Model invocation via a local runner process (ollama)
//! - Spoken and printed output delivery
//! - Per-turn feedback collection persisted to a flat text log
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 Interaction Loop                     │
//! │  input → model → output → feedback → (repeat)       │
//! └───────┬───────────┬───────────┬─────────────────────┘
//!         │           │           │
//! ┌───────▼───┐ ┌─────▼─────┐ ┌───▼─────────┐
//! │ Recognizer│ │ModelRunner│ │   Speaker    │
//! │ (Whisper) │ │ (ollama)  │ │ (TTS + cpal) │
//! └───────────┘ └───────────┘ └──────────────┘
//! ```
//!
//! The three external capabilities are trait seams so the loop can be
//! driven deterministically in tests without audio hardware or a model
//! process.

pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod setup;
pub mod voice;

pub use config::Config;
pub use error::{Error, Result};
pub use model::{FALLBACK_RESPONSE, InvocationError, ModelRunner, OllamaRunner};
pub use session::{
    ConsolePrompter, FeedbackLog, InputChannel, NOT_UNDERSTOOD_MESSAGE, Prompter,
    SERVICE_UNAVAILABLE_MESSAGE, Session, Turn, VoiceInput,
};
pub use voice::{
    ActivationPhrase, AudioCapture, AudioPlayback, AudioSource, Microphone, NullSpeaker,
    RecognitionError, Recognizer, Speaker, SynthesisSpeaker, WhisperRecognizer,
};
