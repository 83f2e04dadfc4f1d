//! Shared test doubles
//!
//! Scripted capability implementations so the interaction loop can be
//! driven deterministically without audio hardware or a model process.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;

use async_trait::async_trait;

use murmur_agent::config::{AgentConfig, ApiKeys, VoiceConfig};
use murmur_agent::voice::{AudioSource, RecognitionError, Recognizer, Speaker};
use murmur_agent::{Config, InputChannel, InvocationError, ModelRunner, Prompter};

/// Build a config pointing the feedback log at the given path
#[must_use]
pub fn test_config(feedback_path: PathBuf) -> Config {
    Config {
        agent: AgentConfig {
            model: "tinyllama".to_string(),
            activation_phrase: "Jarvis".to_string(),
            runner_program: "ollama".to_string(),
        },
        voice: VoiceConfig::default(),
        api_keys: ApiKeys::default(),
        feedback_path,
    }
}

/// Prompter that replays scripted answers
pub struct ScriptedPrompter {
    channels: VecDeque<InputChannel>,
    messages: VecDeque<String>,
    feedback: VecDeque<String>,
}

impl ScriptedPrompter {
    #[must_use]
    pub fn new(
        channels: Vec<InputChannel>,
        messages: Vec<&str>,
        feedback: Vec<&str>,
    ) -> Self {
        Self {
            channels: channels.into_iter().collect(),
            messages: messages.into_iter().map(str::to_string).collect(),
            feedback: feedback.into_iter().map(str::to_string).collect(),
        }
    }

    /// Keyboard-only script: one channel choice per message
    #[must_use]
    pub fn keyboard(messages: Vec<&str>, feedback: Vec<&str>) -> Self {
        let channels = vec![InputChannel::Keyboard; messages.len()];
        Self::new(channels, messages, feedback)
    }
}

impl Prompter for ScriptedPrompter {
    fn choose_channel(&mut self) -> murmur_agent::Result<InputChannel> {
        Ok(self.channels.pop_front().expect("script ran out of channel choices"))
    }

    fn read_message(&mut self) -> murmur_agent::Result<String> {
        Ok(self.messages.pop_front().expect("script ran out of messages"))
    }

    fn ask_feedback(&mut self) -> murmur_agent::Result<String> {
        Ok(self.feedback.pop_front().expect("script ran out of feedback answers"))
    }
}

/// Speaker that records what it was asked to say
pub struct RecordingSpeaker {
    spoken: Rc<RefCell<Vec<String>>>,
}

impl RecordingSpeaker {
    #[must_use]
    pub fn new(spoken: Rc<RefCell<Vec<String>>>) -> Self {
        Self { spoken }
    }
}

#[async_trait(?Send)]
impl Speaker for RecordingSpeaker {
    async fn speak(&mut self, text: &str) -> murmur_agent::Result<()> {
        self.spoken.borrow_mut().push(text.to_string());
        Ok(())
    }
}

/// Speaker whose playback always fails
pub struct FailingSpeaker;

#[async_trait(?Send)]
impl Speaker for FailingSpeaker {
    async fn speak(&mut self, _text: &str) -> murmur_agent::Result<()> {
        Err(murmur_agent::Error::Audio("no output device".to_string()))
    }
}

/// Audio source producing fixed silence-padded samples
pub struct CannedAudioSource;

impl AudioSource for CannedAudioSource {
    fn capture_utterance(&mut self) -> murmur_agent::Result<Vec<f32>> {
        Ok(vec![0.0; 1600])
    }
}

/// Recognizer replaying scripted transcription results
pub struct ScriptedRecognizer {
    results: RefCell<VecDeque<Result<String, RecognitionError>>>,
}

impl ScriptedRecognizer {
    #[must_use]
    pub fn new(results: Vec<Result<String, RecognitionError>>) -> Self {
        Self {
            results: RefCell::new(results.into_iter().collect()),
        }
    }
}

#[async_trait(?Send)]
impl Recognizer for ScriptedRecognizer {
    async fn recognize(&self, _wav: &[u8]) -> Result<String, RecognitionError> {
        self.results
            .borrow_mut()
            .pop_front()
            .expect("script ran out of recognition results")
    }
}

/// Runner that records prompts and answers with a fixed response
pub struct CapturingRunner {
    pub prompts: Rc<RefCell<Vec<String>>>,
    response: String,
}

impl CapturingRunner {
    #[must_use]
    pub fn new(prompts: Rc<RefCell<Vec<String>>>, response: &str) -> Self {
        Self {
            prompts,
            response: response.to_string(),
        }
    }
}

#[async_trait(?Send)]
impl ModelRunner for CapturingRunner {
    async fn run(&self, _model: &str, prompt: &str) -> Result<String, InvocationError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        Ok(self.response.clone())
    }
}

/// Runner that always fails to launch
pub struct FailingRunner;

#[async_trait(?Send)]
impl ModelRunner for FailingRunner {
    async fn run(&self, _model: &str, _prompt: &str) -> Result<String, InvocationError> {
        Err(InvocationError::Launch("no such file or directory".to_string()))
    }
}
