//! Activation phrase handling
//!
//! Recognized speech is only treated as a command when it contains the
//! configured activation phrase. The phrase itself is stripped before the
//! text is handed to the model.

use regex::{Regex, RegexBuilder};

use crate::{Error, Result};

/// Fixed activation phrase, matched case-insensitively
#[derive(Debug, Clone)]
pub struct ActivationPhrase {
    phrase: String,
    pattern: Regex,
}

impl ActivationPhrase {
    /// Create an activation phrase matcher
    ///
    /// The phrase is trimmed; matching is case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns error if the phrase is empty
    pub fn new(phrase: &str) -> Result<Self> {
        let phrase = phrase.trim();
        if phrase.is_empty() {
            return Err(Error::Config("activation phrase must not be empty".to_string()));
        }

        let pattern = RegexBuilder::new(&regex::escape(phrase))
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::Config(format!("invalid activation phrase: {e}")))?;

        Ok(Self {
            phrase: phrase.to_string(),
            pattern,
        })
    }

    /// Check whether the text contains the activation phrase
    #[must_use]
    pub fn is_activated(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Remove every occurrence of the activation phrase and trim the result
    #[must_use]
    pub fn strip(&self, text: &str) -> String {
        self.pattern.replace_all(text, "").trim().to_string()
    }

    /// The configured phrase
    #[must_use]
    pub fn phrase(&self) -> &str {
        &self.phrase
    }
}
