//! TOML configuration file loading
//!
//! Supports `~/.config/murmur/config.toml` as a persistent config source.
//! All fields are optional — the file is a partial overlay on top of defaults.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct MurmurConfigFile {
    /// Agent configuration
    #[serde(default)]
    pub agent: AgentFileConfig,

    /// Voice/audio configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,

    /// Feedback log configuration
    #[serde(default)]
    pub feedback: FeedbackFileConfig,
}

/// Agent-related configuration
#[derive(Debug, Default, Deserialize)]
pub struct AgentFileConfig {
    /// Model identifier (e.g. "tinyllama")
    pub model: Option<String>,

    /// Activation phrase for voice input (e.g. "Jarvis")
    pub activation_phrase: Option<String>,

    /// Model runner program (e.g. "ollama")
    pub runner: Option<String>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// Enable voice input/output
    pub enabled: Option<bool>,

    /// STT model (e.g. "whisper-1")
    pub stt_model: Option<String>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "alloy")
    pub tts_voice: Option<String>,

    /// TTS speed multiplier
    pub tts_speed: Option<f32>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub openai: Option<String>,
}

/// Feedback log configuration
#[derive(Debug, Default, Deserialize)]
pub struct FeedbackFileConfig {
    /// Target file for the feedback log (default "feedback_log.txt")
    pub path: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `MurmurConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> MurmurConfigFile {
    let Some(path) = config_file_path() else {
        return MurmurConfigFile::default();
    };

    if !path.exists() {
        return MurmurConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                MurmurConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            MurmurConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/murmur/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("murmur").join("config.toml"))
}
