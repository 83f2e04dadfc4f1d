//! Speech synthesis
//!
//! The speaker is an opaque capability: text in, audible output out. The
//! call blocks until playback completes so consecutive turns never overlap.

use async_trait::async_trait;

use crate::{Error, Result};

use super::playback::AudioPlayback;

/// Renders text as audible speech
#[async_trait(?Send)]
pub trait Speaker {
    /// Speak the text, blocking until playback completes
    ///
    /// # Errors
    ///
    /// Returns error if synthesis or playback fails
    async fn speak(&mut self, text: &str) -> Result<()>;
}

/// Speaker backed by `OpenAI` TTS and local playback
pub struct SynthesisSpeaker {
    client: reqwest::Client,
    api_key: String,
    voice: String,
    speed: f32,
    model: String,
    playback: AudioPlayback,
}

impl SynthesisSpeaker {
    /// Create a new synthesis speaker
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing or no output device is
    /// available
    pub fn new(api_key: String, voice: String, speed: f32, model: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("OpenAI API key required for TTS".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            voice,
            speed,
            model,
            playback: AudioPlayback::new()?,
        })
    }

    /// Synthesize text to MP3 bytes
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct TtsRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            speed: f32,
        }

        let request = TtsRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
            speed: self.speed,
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/speech")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("OpenAI TTS error {status}: {body}")));
        }

        let audio = response.bytes().await?;
        Ok(audio.to_vec())
    }
}

#[async_trait(?Send)]
impl Speaker for SynthesisSpeaker {
    async fn speak(&mut self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        let mp3 = self.synthesize(text).await?;
        tracing::debug!(bytes = mp3.len(), "synthesized speech");

        self.playback.play_mp3(&mp3)
    }
}

/// Speaker that produces no audio
///
/// Used when voice is disabled or no output device/API key is available;
/// responses are still printed.
#[derive(Debug, Default)]
pub struct NullSpeaker;

#[async_trait(?Send)]
impl Speaker for NullSpeaker {
    async fn speak(&mut self, text: &str) -> Result<()> {
        tracing::debug!(chars = text.len(), "voice output disabled, skipping speech");
        Ok(())
    }
}
