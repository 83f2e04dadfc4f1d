//! Speech recognition
//!
//! The recognizer is an opaque capability: WAV bytes in, text out. Failure
//! is split into "could not understand the audio" and "service unavailable"
//! because the interaction loop reacts to each differently.

use async_trait::async_trait;
use thiserror::Error;

/// Ways speech recognition can fail
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// The audio did not contain intelligible speech
    #[error("could not understand audio")]
    NotUnderstood,

    /// The recognition service could not be reached or rejected the request
    #[error("recognition service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Transcribes one utterance of speech to text
#[async_trait(?Send)]
pub trait Recognizer {
    /// Transcribe WAV audio to text
    ///
    /// # Errors
    ///
    /// Returns [`RecognitionError::NotUnderstood`] for unintelligible audio
    /// and [`RecognitionError::ServiceUnavailable`] for transport or API
    /// failures
    async fn recognize(&self, wav: &[u8]) -> Result<String, RecognitionError>;
}

/// Response from OpenAI Whisper transcription API
#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Recognizer backed by `OpenAI` Whisper
pub struct WhisperRecognizer {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl WhisperRecognizer {
    /// Create a new Whisper recognizer
    ///
    /// # Errors
    ///
    /// Returns error if API key is missing
    pub fn new(api_key: String, model: String) -> crate::Result<Self> {
        if api_key.is_empty() {
            return Err(crate::Error::Config(
                "OpenAI API key required for Whisper".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        })
    }
}

#[async_trait(?Send)]
impl Recognizer for WhisperRecognizer {
    async fn recognize(&self, wav: &[u8]) -> Result<String, RecognitionError> {
        tracing::debug!(audio_bytes = wav.len(), "starting Whisper transcription");

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(wav.to_vec())
                    .file_name("audio.wav")
                    .mime_str("audio/wav")
                    .map_err(|e| RecognitionError::ServiceUnavailable(e.to_string()))?,
            )
            .text("model", self.model.clone());

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/transcriptions")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Whisper request failed");
                RecognitionError::ServiceUnavailable(e.to_string())
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Whisper API error");
            return Err(RecognitionError::ServiceUnavailable(format!(
                "Whisper API error {status}: {body}"
            )));
        }

        let result: WhisperResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse response");
            RecognitionError::ServiceUnavailable(e.to_string())
        })?;

        if result.text.trim().is_empty() {
            tracing::debug!("empty transcript");
            return Err(RecognitionError::NotUnderstood);
        }

        tracing::info!(transcript = %result.text, "transcription complete");
        Ok(result.text)
    }
}
