//! Interactive first-run setup wizard (`murmur setup`)

use std::path::PathBuf;

use dialoguer::{Confirm, Input};

use crate::config::file::{
    AgentFileConfig, ApiKeysFileConfig, FeedbackFileConfig, MurmurConfigFile, VoiceFileConfig,
};

/// Run the interactive setup wizard
///
/// # Errors
///
/// Returns error if user input fails or config cannot be written
pub fn run_setup() -> anyhow::Result<()> {
    println!("Murmur Setup\n");

    // Load existing config if present
    let existing = crate::config::file::load_config_file();
    let config_path = crate::config::file::config_file_path()
        .unwrap_or_else(|| PathBuf::from("~/.config/murmur/config.toml"));

    if config_path.exists() {
        println!("Existing config found at {}\n", config_path.display());
    }

    // 1. Model identifier
    let default_model = existing
        .agent
        .model
        .unwrap_or_else(|| "tinyllama".to_string());

    let model: String = Input::new()
        .with_prompt("Model (passed to `ollama run`)")
        .default(default_model)
        .interact_text()?;

    // 2. Activation phrase
    let default_phrase = existing
        .agent
        .activation_phrase
        .unwrap_or_else(|| "Jarvis".to_string());

    let activation_phrase: String = Input::new()
        .with_prompt("Activation phrase for voice input")
        .default(default_phrase)
        .interact_text()?;

    // 3. Voice (optional)
    let voice_default = existing.voice.enabled.unwrap_or(true);
    let enable_voice = Confirm::new()
        .with_prompt("Enable voice (STT/TTS)?")
        .default(voice_default)
        .interact()?;

    // 4. OpenAI key for Whisper/TTS
    let mut api_keys = ApiKeysFileConfig::default();
    if enable_voice {
        let existing_key = existing.api_keys.openai.as_deref();

        let masked = existing_key.map(|k| {
            if k.len() > 8 {
                format!("{}...{}", &k[..4], &k[k.len() - 4..])
            } else {
                "****".to_string()
            }
        });

        let prompt = masked.as_ref().map_or_else(
            || "OpenAI API key for Whisper/TTS (OPENAI_API_KEY)".to_string(),
            |m| format!("OpenAI API key (current: {m}, leave blank to keep)"),
        );

        let key_input: String = Input::new()
            .with_prompt(&prompt)
            .allow_empty(true)
            .interact_text()?;

        api_keys.openai = if key_input.is_empty() {
            existing_key.map(str::to_string)
        } else {
            Some(key_input)
        };
    } else {
        api_keys.openai = existing.api_keys.openai;
    }

    let voice = if enable_voice {
        VoiceFileConfig {
            enabled: Some(true),
            stt_model: Some(
                existing
                    .voice
                    .stt_model
                    .unwrap_or_else(|| "whisper-1".to_string()),
            ),
            tts_model: Some(
                existing
                    .voice
                    .tts_model
                    .unwrap_or_else(|| "tts-1".to_string()),
            ),
            tts_voice: Some(
                existing
                    .voice
                    .tts_voice
                    .unwrap_or_else(|| "alloy".to_string()),
            ),
            tts_speed: existing.voice.tts_speed.or(Some(1.0)),
        }
    } else {
        VoiceFileConfig {
            enabled: Some(false),
            ..VoiceFileConfig::default()
        }
    };

    // 5. Feedback log path
    let default_feedback = existing
        .feedback
        .path
        .unwrap_or_else(|| "feedback_log.txt".to_string());

    let feedback_path: String = Input::new()
        .with_prompt("Feedback log file")
        .default(default_feedback)
        .interact_text()?;

    // 6. Build and write config
    let config_file = MurmurConfigFile {
        agent: AgentFileConfig {
            model: Some(model),
            activation_phrase: Some(activation_phrase),
            runner: existing.agent.runner,
        },
        voice,
        api_keys,
        feedback: FeedbackFileConfig {
            path: Some(feedback_path),
        },
    };

    write_config(&config_path, &config_file)?;
    println!("\nConfig written to {}", config_path.display());
    println!("\nSetup complete! Run `murmur -v` to start.");

    Ok(())
}

/// Serialize and write the config file
fn write_config(path: &PathBuf, config: &MurmurConfigFile) -> anyhow::Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let toml = serialize_config(config);
    std::fs::write(path, toml)?;

    Ok(())
}

/// Serialize config to a readable TOML string
fn serialize_config(config: &MurmurConfigFile) -> String {
    let mut out = String::new();

    // [agent]
    let ag = &config.agent;
    if ag.model.is_some() || ag.activation_phrase.is_some() || ag.runner.is_some() {
        out.push_str("[agent]\n");
        if let Some(ref model) = ag.model {
            out.push_str(&format!("model = \"{model}\"\n"));
        }
        if let Some(ref phrase) = ag.activation_phrase {
            out.push_str(&format!("activation_phrase = \"{phrase}\"\n"));
        }
        if let Some(ref runner) = ag.runner {
            out.push_str(&format!("runner = \"{runner}\"\n"));
        }
        out.push('\n');
    }

    // [voice]
    if config.voice.enabled.is_some() {
        out.push_str("[voice]\n");
        if let Some(enabled) = config.voice.enabled {
            out.push_str(&format!("enabled = {enabled}\n"));
        }
        if let Some(ref m) = config.voice.stt_model {
            out.push_str(&format!("stt_model = \"{m}\"\n"));
        }
        if let Some(ref m) = config.voice.tts_model {
            out.push_str(&format!("tts_model = \"{m}\"\n"));
        }
        if let Some(ref v) = config.voice.tts_voice {
            out.push_str(&format!("tts_voice = \"{v}\"\n"));
        }
        if let Some(s) = config.voice.tts_speed {
            out.push_str(&format!("tts_speed = {s}\n"));
        }
        out.push('\n');
    }

    // [api_keys]
    if let Some(ref key) = config.api_keys.openai {
        out.push_str("[api_keys]\n");
        out.push_str(&format!("openai = \"{key}\"\n"));
        out.push('\n');
    }

    // [feedback]
    if let Some(ref path) = config.feedback.path {
        out.push_str("[feedback]\n");
        out.push_str(&format!("path = \"{path}\"\n"));
        out.push('\n');
    }

    out
}
