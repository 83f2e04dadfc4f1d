//! Interactive console prompts
//!
//! The prompter is the console-facing capability: it asks which input
//! channel to use this turn, reads typed messages, and asks the feedback
//! question. Tests substitute a scripted implementation.

use dialoguer::{Confirm, Input};

use crate::{Error, Result};

/// Input channel chosen for a single turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputChannel {
    /// Capture one utterance from the microphone
    Microphone,
    /// Read one line from the keyboard
    Keyboard,
}

/// Console interaction for the loop's two per-turn questions
pub trait Prompter {
    /// Ask which input channel to use for this turn
    ///
    /// # Errors
    ///
    /// Returns error if the console interaction fails
    fn choose_channel(&mut self) -> Result<InputChannel>;

    /// Read a typed message, returned unmodified
    ///
    /// # Errors
    ///
    /// Returns error if the console interaction fails
    fn read_message(&mut self) -> Result<String>;

    /// Ask the feedback question; any answer is accepted verbatim
    ///
    /// # Errors
    ///
    /// Returns error if the console interaction fails
    fn ask_feedback(&mut self) -> Result<String>;
}

/// Prompter over the terminal via dialoguer
#[derive(Debug)]
pub struct ConsolePrompter {
    voice_available: bool,
}

impl ConsolePrompter {
    /// Create a console prompter
    ///
    /// When voice is unavailable the channel question is skipped and every
    /// turn reads from the keyboard.
    #[must_use]
    pub const fn new(voice_available: bool) -> Self {
        Self { voice_available }
    }
}

impl Prompter for ConsolePrompter {
    fn choose_channel(&mut self) -> Result<InputChannel> {
        if !self.voice_available {
            return Ok(InputChannel::Keyboard);
        }

        let use_mic = Confirm::new()
            .with_prompt("Use the microphone?")
            .default(true)
            .interact()
            .map_err(|e| Error::Console(e.to_string()))?;

        Ok(if use_mic {
            InputChannel::Microphone
        } else {
            InputChannel::Keyboard
        })
    }

    fn read_message(&mut self) -> Result<String> {
        Input::new()
            .with_prompt("Type your chat, I'm listening")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| Error::Console(e.to_string()))
    }

    fn ask_feedback(&mut self) -> Result<String> {
        Input::new()
            .with_prompt("Was this response helpful? (yes/no)")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| Error::Console(e.to_string()))
    }
}
