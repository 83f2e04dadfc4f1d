//! Model invocation
//!
//! The language model runs as an external process (`ollama run <model>
//! <prompt>`). The [`invoke`] operation never fails: every runner error and
//! empty output collapses into a fixed fallback response, and the raw
//! subprocess streams are surfaced only as debug traces.

use async_trait::async_trait;
use thiserror::Error;

/// Response returned when the model cannot produce output
pub const FALLBACK_RESPONSE: &str = "I'm having trouble processing your request right now.";

/// Ways a model invocation can fail
#[derive(Debug, Error)]
pub enum InvocationError {
    /// The runner process could not be launched
    #[error("failed to launch model runner: {0}")]
    Launch(String),
}

/// Runs a prompt through a language model and returns its raw output
#[async_trait(?Send)]
pub trait ModelRunner {
    /// Run the prompt through the named model, returning raw standard output
    ///
    /// # Errors
    ///
    /// Returns error if the runner process cannot be launched
    async fn run(&self, model: &str, prompt: &str) -> Result<String, InvocationError>;
}

/// Model runner that shells out to the ollama CLI
pub struct OllamaRunner {
    program: String,
}

impl OllamaRunner {
    /// Create a runner for the given program (normally "ollama")
    #[must_use]
    pub const fn new(program: String) -> Self {
        Self { program }
    }
}

#[async_trait(?Send)]
impl ModelRunner for OllamaRunner {
    async fn run(&self, model: &str, prompt: &str) -> Result<String, InvocationError> {
        let output = tokio::process::Command::new(&self.program)
            .arg("run")
            .arg(model)
            .arg(prompt)
            .output()
            .await
            .map_err(|e| InvocationError::Launch(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);

        tracing::debug!(raw = %stdout, "model runner stdout");
        if !stderr.is_empty() {
            tracing::debug!(stderr = %stderr, "model runner stderr");
        }
        if !output.status.success() {
            tracing::debug!(status = %output.status, "model runner exited non-zero");
        }

        Ok(stdout)
    }
}

/// Invoke the model and return a response, falling back on any failure
///
/// Returns the trimmed runner output when non-empty; otherwise, or when the
/// invocation fails for any reason, returns [`FALLBACK_RESPONSE`].
pub async fn invoke(runner: &dyn ModelRunner, model: &str, prompt: &str) -> String {
    match runner.run(model, prompt).await {
        Ok(output) => {
            let trimmed = output.trim();
            if trimmed.is_empty() {
                tracing::debug!(model, "model produced no output, using fallback");
                FALLBACK_RESPONSE.to_string()
            } else {
                trimmed.to_string()
            }
        }
        Err(e) => {
            tracing::debug!(model, error = %e, "model invocation failed, using fallback");
            FALLBACK_RESPONSE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticRunner(Result<String, ()>);

    #[async_trait(?Send)]
    impl ModelRunner for StaticRunner {
        async fn run(&self, _model: &str, _prompt: &str) -> Result<String, InvocationError> {
            self.0
                .clone()
                .map_err(|()| InvocationError::Launch("no such file".to_string()))
        }
    }

    #[tokio::test]
    async fn returns_trimmed_output() {
        let runner = StaticRunner(Ok("  Hello there!\n".to_string()));
        assert_eq!(invoke(&runner, "tinyllama", "hi").await, "Hello there!");
    }

    #[tokio::test]
    async fn empty_output_falls_back() {
        let runner = StaticRunner(Ok("   \n".to_string()));
        assert_eq!(invoke(&runner, "tinyllama", "hi").await, FALLBACK_RESPONSE);
    }

    #[tokio::test]
    async fn launch_failure_falls_back() {
        let runner = StaticRunner(Err(()));
        assert_eq!(invoke(&runner, "tinyllama", "hi").await, FALLBACK_RESPONSE);
    }
}
