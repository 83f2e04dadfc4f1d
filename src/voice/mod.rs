//! Voice processing module
//!
//! Audio capture with utterance endpointing, activation phrase handling,
//! speech recognition, and speech synthesis with playback.

mod activation;
mod capture;
mod endpoint;
mod playback;
mod recognizer;
mod speaker;

pub use activation::ActivationPhrase;
pub use capture::{AudioCapture, AudioSource, Microphone, SAMPLE_RATE, samples_to_wav};
pub use endpoint::{EndpointState, UtteranceDetector};
pub use playback::AudioPlayback;
pub use recognizer::{RecognitionError, Recognizer, WhisperRecognizer};
pub use speaker::{NullSpeaker, Speaker, SynthesisSpeaker};
