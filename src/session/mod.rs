//! The interaction loop
//!
//! One session owns the configuration, the capability objects (audio
//! source, recognizer, speaker, model runner, prompter), and the feedback
//! log — the sole mutable state in the process. Each turn runs end-to-end
//! on a single thread: acquire input, invoke the model, deliver the reply,
//! record feedback.

mod feedback;
mod prompter;

pub use feedback::{FeedbackLog, SEPARATOR_WIDTH, Turn};
pub use prompter::{ConsolePrompter, InputChannel, Prompter};

use crate::config::Config;
use crate::model::{self, ModelRunner};
use crate::voice::{
    ActivationPhrase, AudioSource, RecognitionError, Recognizer, SAMPLE_RATE, Speaker,
    samples_to_wav,
};
use crate::Result;

/// Message substituted when recognition cannot understand the audio
pub const NOT_UNDERSTOOD_MESSAGE: &str = "Sorry, I didn't catch that.";

/// Message substituted when the recognition service is unreachable
pub const SERVICE_UNAVAILABLE_MESSAGE: &str = "Speech recognition service is unavailable.";

/// Spoken farewell on termination
const FAREWELL: &str = "Goodbye!";

/// States of the interaction loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    /// Waiting for the user's message
    AwaitingInput,
    /// Running the prompt through the model
    InvokingModel,
    /// Printing and speaking the response
    DeliveringOutput,
    /// Asking the feedback question
    RecordingFeedback,
    /// Farewell, persistence, exit
    Terminating,
}

/// Voice input capabilities (audio source + recognizer)
///
/// Absent when voice input is disabled or unavailable; the session then
/// reads from the keyboard only.
pub struct VoiceInput {
    /// Source of captured utterances
    pub audio: Box<dyn AudioSource>,
    /// Speech recognizer
    pub recognizer: Box<dyn Recognizer>,
}

/// An interactive chat session
pub struct Session {
    config: Config,
    activation: ActivationPhrase,
    voice: Option<VoiceInput>,
    speaker: Box<dyn Speaker>,
    runner: Box<dyn ModelRunner>,
    prompter: Box<dyn Prompter>,
    feedback: FeedbackLog,
}

impl Session {
    /// Create a session from configuration and capability objects
    ///
    /// # Errors
    ///
    /// Returns error if the configured activation phrase is invalid
    pub fn new(
        config: Config,
        prompter: Box<dyn Prompter>,
        runner: Box<dyn ModelRunner>,
        speaker: Box<dyn Speaker>,
        voice: Option<VoiceInput>,
    ) -> Result<Self> {
        let activation = ActivationPhrase::new(&config.agent.activation_phrase)?;

        Ok(Self {
            config,
            activation,
            voice,
            speaker,
            runner,
            prompter,
            feedback: FeedbackLog::new(),
        })
    }

    /// Recorded feedback for completed turns
    #[must_use]
    pub fn feedback(&self) -> &FeedbackLog {
        &self.feedback
    }

    /// Run the interaction loop until the user exits
    ///
    /// # Errors
    ///
    /// Returns error if the console becomes unusable; every other failure
    /// is handled within the turn
    pub async fn run(&mut self) -> Result<()> {
        println!("Agent is now running. Say 'exit' or 'quit' to stop.");

        let mut state = SessionState::AwaitingInput;
        let mut prompt = String::new();
        let mut response = String::new();

        loop {
            state = match state {
                SessionState::AwaitingInput => match self.acquire_input().await? {
                    // No activated input this turn; ask again
                    None => SessionState::AwaitingInput,
                    Some(text) if is_exit_command(&text) => SessionState::Terminating,
                    Some(text) => {
                        println!("You: {text}");
                        prompt = text;
                        SessionState::InvokingModel
                    }
                },

                SessionState::InvokingModel => {
                    response =
                        model::invoke(self.runner.as_ref(), &self.config.agent.model, &prompt)
                            .await;
                    SessionState::DeliveringOutput
                }

                SessionState::DeliveringOutput => {
                    self.deliver(&response).await;
                    SessionState::RecordingFeedback
                }

                SessionState::RecordingFeedback => {
                    let feedback = self.prompter.ask_feedback()?;
                    self.feedback
                        .record(prompt.clone(), response.clone(), feedback);
                    println!("Feedback saved.");
                    SessionState::AwaitingInput
                }

                SessionState::Terminating => {
                    if let Err(e) = self.speaker.speak(FAREWELL).await {
                        tracing::warn!(error = %e, "farewell playback failed");
                    }
                    self.persist_feedback();
                    return Ok(());
                }
            };
        }
    }

    /// Acquire the user's message for this turn
    ///
    /// Returns `None` when there is no message (activation phrase not
    /// detected, or the microphone failed); the loop re-prompts.
    async fn acquire_input(&mut self) -> Result<Option<String>> {
        match self.prompter.choose_channel()? {
            InputChannel::Keyboard => Ok(Some(self.prompter.read_message()?)),
            InputChannel::Microphone => Ok(self.listen().await),
        }
    }

    /// Capture one utterance and turn it into a message
    async fn listen(&mut self) -> Option<String> {
        let Some(voice) = self.voice.as_mut() else {
            tracing::warn!("microphone chosen but voice input is unavailable");
            return None;
        };

        println!("Listening...");

        let wav = match voice
            .audio
            .capture_utterance()
            .and_then(|samples| samples_to_wav(&samples, SAMPLE_RATE))
        {
            Ok(wav) => wav,
            Err(e) => {
                tracing::warn!(error = %e, "audio capture failed");
                println!("Microphone capture failed: {e}");
                return None;
            }
        };

        match voice.recognizer.recognize(&wav).await {
            Ok(text) => {
                if self.activation.is_activated(&text) {
                    Some(self.activation.strip(&text))
                } else {
                    println!("Activation phrase not detected.");
                    None
                }
            }
            Err(RecognitionError::NotUnderstood) => {
                // Recognition failures become the turn's message; the quirk
                // is kept from the source behavior
                println!("{NOT_UNDERSTOOD_MESSAGE}");
                Some(NOT_UNDERSTOOD_MESSAGE.to_string())
            }
            Err(RecognitionError::ServiceUnavailable(reason)) => {
                tracing::warn!(%reason, "recognition service unavailable");
                println!("{SERVICE_UNAVAILABLE_MESSAGE}");
                Some(SERVICE_UNAVAILABLE_MESSAGE.to_string())
            }
        }
    }

    /// Print the response and speak it, blocking until playback finishes
    async fn deliver(&mut self, response: &str) {
        println!("AI: {response}");

        if let Err(e) = self.speaker.speak(response).await {
            tracing::warn!(error = %e, "speech playback failed");
        }
    }

    /// Write the feedback log; failure is reported and the log is dropped
    fn persist_feedback(&self) {
        match self.feedback.save(&self.config.feedback_path) {
            Ok(()) => {
                println!("Feedback saved to {}.", self.config.feedback_path.display());
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to save feedback log");
                println!("Error saving feedback: {e}");
            }
        }
    }
}

/// Whether the acquired input ends the session
fn is_exit_command(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}
