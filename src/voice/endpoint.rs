//! Utterance endpointing
//!
//! Segments one spoken utterance out of the capture stream using RMS energy:
//! speech starts the segment, sustained silence ends it.

/// Minimum audio energy threshold to consider speech
const ENERGY_THRESHOLD: f32 = 0.03;

/// Minimum duration of speech to accept an utterance (in samples at 16kHz)
const MIN_SPEECH_SAMPLES: usize = 4800; // 0.3 seconds

/// Silence duration to consider end of utterance (in samples)
const SILENCE_SAMPLES: usize = 8000; // 0.5 seconds

/// State of the utterance detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndpointState {
    /// Waiting for speech to begin
    #[default]
    Idle,
    /// Speech detected, accumulating the utterance
    Capturing,
}

/// Detects the boundaries of a single utterance
#[derive(Debug, Default)]
pub struct UtteranceDetector {
    state: EndpointState,
    samples: Vec<f32>,
    silence_counter: usize,
}

impl UtteranceDetector {
    /// Create a new detector in the idle state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of samples
    ///
    /// Returns true once a complete utterance (speech followed by silence)
    /// has been accumulated.
    pub fn feed(&mut self, chunk: &[f32]) -> bool {
        let energy = calculate_energy(chunk);
        let is_speech = energy > ENERGY_THRESHOLD;

        match self.state {
            EndpointState::Idle => {
                if is_speech {
                    self.state = EndpointState::Capturing;
                    self.samples.clear();
                    self.samples.extend_from_slice(chunk);
                    self.silence_counter = 0;
                    tracing::trace!(energy, "speech detected");
                }
            }
            EndpointState::Capturing => {
                self.samples.extend_from_slice(chunk);

                if is_speech {
                    self.silence_counter = 0;
                } else {
                    self.silence_counter += chunk.len();
                }

                tracing::trace!(
                    accumulated = self.samples.len(),
                    silence = self.silence_counter,
                    energy,
                    "capturing utterance"
                );

                // Speech portion excludes the trailing silence so a brief
                // noise blip never passes the minimum on silence alone
                let speech_len = self.samples.len().saturating_sub(self.silence_counter);
                if self.silence_counter > SILENCE_SAMPLES && speech_len > MIN_SPEECH_SAMPLES {
                    tracing::debug!(samples = self.samples.len(), "utterance complete");
                    return true;
                }

                // A blip too short to be speech followed by long silence:
                // drop it and wait for real speech
                if self.silence_counter > SILENCE_SAMPLES * 2 {
                    tracing::trace!("discarding short noise segment");
                    self.reset();
                }
            }
        }

        false
    }

    /// Take the accumulated samples, resetting the detector
    pub fn take_samples(&mut self) -> Vec<f32> {
        self.state = EndpointState::Idle;
        self.silence_counter = 0;
        std::mem::take(&mut self.samples)
    }

    /// Samples accumulated so far
    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Reset to the idle state, discarding accumulated samples
    pub fn reset(&mut self) {
        self.state = EndpointState::Idle;
        self.samples.clear();
        self.silence_counter = 0;
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> EndpointState {
        self.state
    }
}

/// Calculate RMS energy of audio samples
#[allow(clippy::cast_precision_loss)]
fn calculate_energy(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}
