//! Per-turn feedback log
//!
//! Turns are collected in memory for the lifetime of the session and
//! flushed to a flat text file exactly once, at normal termination.

use std::fmt::Write as _;
use std::path::Path;

use crate::Result;

/// Width of the separator line between feedback records
pub const SEPARATOR_WIDTH: usize = 50;

/// One completed interaction cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Text the user supplied, after activation phrase stripping
    pub prompt: String,

    /// Text returned by the model
    pub response: String,

    /// Free-text user judgment, accepted verbatim
    pub feedback: String,
}

/// Ordered session log of completed turns
#[derive(Debug, Default)]
pub struct FeedbackLog {
    turns: Vec<Turn>,
}

impl FeedbackLog {
    /// Create an empty log
    #[must_use]
    pub const fn new() -> Self {
        Self { turns: Vec::new() }
    }

    /// Append a completed turn
    pub fn record(&mut self, prompt: String, response: String, feedback: String) {
        self.turns.push(Turn {
            prompt,
            response,
            feedback,
        });
    }

    /// Number of recorded turns
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether no turns have been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Recorded turns in chronological order
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Render every record as a flat text block
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for turn in &self.turns {
            let _ = writeln!(out, "Prompt: {}", turn.prompt);
            let _ = writeln!(out, "Response: {}", turn.response);
            let _ = writeln!(out, "Feedback: {}", turn.feedback);
            out.push_str(&"-".repeat(SEPARATOR_WIDTH));
            out.push('\n');
        }
        out
    }

    /// Write the log to the target file, replacing any previous contents
    ///
    /// The whole log is rendered before a single write so the file never
    /// holds a partially formatted record.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render())?;
        tracing::info!(path = %path.display(), turns = self.turns.len(), "feedback log written");
        Ok(())
    }
}
