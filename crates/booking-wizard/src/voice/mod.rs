//! Voice capabilities used by the booking wizard
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Host speech capabilities                │
//! │   ┌────────────────────┐        ┌────────────────────┐   │
//! │   │  SpeechRecognizer  │        │    TextToSpeech    │   │
//! │   │   (single-shot)    │        │  (prompt read-out) │   │
//! │   └─────────┬──────────┘        └─────────▲──────────┘   │
//! │             │ RecognitionSession          │ SpeechRequest│
//! │   ┌─────────▼──────────┐        ┌─────────┴──────────┐   │
//! │   │ VoiceInputAdapter  │───────▶│   BookingSession   │   │
//! │   │  (one session max) │ Outcome│                    │   │
//! │   └────────────────────┘        └────────────────────┘   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! How audio becomes text is up to the host; the wizard only sees transcripts.

pub mod adapter;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use adapter::{interpret_transcript, VoiceInputAdapter, VoiceOutcome, VoiceState};

use crate::locale::Locale;

/// Voice processing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoiceError {
    #[error("Speech recognition is not available")]
    Unsupported,

    #[error("Failed to start recognition: {0}")]
    StartFailed(String),

    #[error("Recognition error: {0}")]
    Recognition(String),

    #[error("Recognition ended without a result")]
    EndedWithoutResult,

    #[error("Failed to stop recognition: {0}")]
    StopFailed(String),

    #[error("TTS error: {0}")]
    TTSError(String),
}

pub type VoiceResult<T> = Result<T, VoiceError>;

/// How a recognition session is configured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionConfig {
    pub language: String,
    pub continuous: bool,
    pub interim_results: bool,
}

impl RecognitionConfig {
    /// One utterance, final results only
    pub fn single_shot(locale: Locale) -> Self {
        Self {
            language: locale.language_tag().to_string(),
            continuous: false,
            interim_results: false,
        }
    }
}

/// One candidate reading of an utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechAlternative {
    pub transcript: String,
    pub confidence: f32,
}

/// Recognized results, each with its alternatives
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    pub results: Vec<Vec<SpeechAlternative>>,
}

impl RecognitionResult {
    /// Result holding a single transcript
    pub fn single(transcript: impl Into<String>) -> Self {
        Self {
            results: vec![vec![SpeechAlternative {
                transcript: transcript.into(),
                confidence: 1.0,
            }]],
        }
    }

    /// Transcript of the first alternative of the first result
    pub fn first_transcript(&self) -> Option<&str> {
        self.results
            .first()
            .and_then(|alternatives| alternatives.first())
            .map(|alt| alt.transcript.as_str())
    }
}

/// What a recognition session ended with
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    Result(RecognitionResult),
    Error(VoiceError),
    Ended,
}

/// An open recognition session
#[async_trait]
pub trait RecognitionSession: Send {
    /// Wait for the session's single outcome
    async fn outcome(&mut self) -> RecognitionEvent;

    /// Stop listening. Called on every exit path, including after an outcome.
    fn stop(&mut self) -> VoiceResult<()>;
}

/// Speech-to-text capability offered by the host
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn start(&self, config: RecognitionConfig) -> VoiceResult<Box<dyn RecognitionSession>>;
}

/// Request for reading text aloud
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechRequest {
    pub text: String,
    pub language: String,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>, locale: Locale) -> Self {
        Self {
            text: text.into(),
            language: locale.language_tag().to_string(),
        }
    }
}

/// Text-to-Speech sink
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    async fn speak(&self, request: SpeechRequest) -> VoiceResult<()>;
}
