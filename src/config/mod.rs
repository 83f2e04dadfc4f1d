//! Configuration management for the murmur agent

pub mod file;

use std::path::PathBuf;

use crate::Result;

/// Fallback model identifier when nothing is configured
const DEFAULT_MODEL: &str = "tinyllama";

/// Fallback activation phrase for voice input
const DEFAULT_ACTIVATION_PHRASE: &str = "Jarvis";

/// Murmur agent configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Agent behavior (model, activation phrase, runner)
    pub agent: AgentConfig,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// API keys
    pub api_keys: ApiKeys,

    /// Path the feedback log is written to on exit
    pub feedback_path: PathBuf,
}

/// Agent behavior configuration
///
/// Set at construction and immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Model identifier passed to the runner (e.g. "tinyllama")
    pub model: String,

    /// Activation phrase that must appear in recognized speech,
    /// compared case-insensitively
    pub activation_phrase: String,

    /// Model runner program (defaults to "ollama")
    pub runner_program: String,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Enable voice input/output
    pub enabled: bool,

    /// STT model (e.g. "whisper-1")
    pub stt_model: String,

    /// TTS model (e.g. "tts-1")
    pub tts_model: String,

    /// TTS voice identifier (e.g. "alloy")
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stt_model: "whisper-1".to_string(),
            tts_model: "tts-1".to_string(),
            tts_voice: "alloy".to_string(),
            tts_speed: 1.0,
        }
    }
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// `OpenAI` API key (for Whisper and TTS)
    pub openai: Option<String>,
}

impl Config {
    /// Load configuration from the overlay file and environment
    ///
    /// Precedence: defaults, then the TOML config file, then environment
    /// variables (`MURMUR_MODEL`, `MURMUR_DISABLE_VOICE`, `OPENAI_API_KEY`).
    ///
    /// # Errors
    ///
    /// Returns error if a configured value is invalid
    pub fn load() -> Result<Self> {
        Self::load_with_options(None, false)
    }

    /// Load configuration with CLI overrides applied
    ///
    /// # Errors
    ///
    /// Returns error if a configured value is invalid
    pub fn load_with_options(model_override: Option<&str>, disable_voice: bool) -> Result<Self> {
        let file = file::load_config_file();

        let model = model_override
            .map(str::to_string)
            .or_else(|| std::env::var("MURMUR_MODEL").ok())
            .or(file.agent.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let activation_phrase = file
            .agent
            .activation_phrase
            .unwrap_or_else(|| DEFAULT_ACTIVATION_PHRASE.to_string());

        let runner_program = file
            .agent
            .runner
            .unwrap_or_else(|| "ollama".to_string());

        let voice_defaults = VoiceConfig::default();
        let enabled = if disable_voice || std::env::var("MURMUR_DISABLE_VOICE").is_ok() {
            false
        } else {
            file.voice.enabled.unwrap_or(voice_defaults.enabled)
        };

        let voice = VoiceConfig {
            enabled,
            stt_model: file.voice.stt_model.unwrap_or(voice_defaults.stt_model),
            tts_model: file.voice.tts_model.unwrap_or(voice_defaults.tts_model),
            tts_voice: file.voice.tts_voice.unwrap_or(voice_defaults.tts_voice),
            tts_speed: file.voice.tts_speed.unwrap_or(voice_defaults.tts_speed),
        };

        let api_keys = ApiKeys {
            openai: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.is_empty())
                .or(file.api_keys.openai),
        };

        let feedback_path = file
            .feedback
            .path
            .map_or_else(|| PathBuf::from("feedback_log.txt"), PathBuf::from);

        Ok(Self {
            agent: AgentConfig {
                model,
                activation_phrase,
                runner_program,
            },
            voice,
            api_keys,
            feedback_path,
        })
    }
}
