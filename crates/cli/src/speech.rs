//! Terminal stand-ins for the host speech capabilities
//!
//! Prompts are "spoken" by printing them, and the recognizer hears whatever
//! the user typed after `/say` or at the `/voice` prompt.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use booking_wizard::{
    voice::VoiceResult, RecognitionConfig, RecognitionEvent, RecognitionResult,
    RecognitionSession, SpeechRecognizer, SpeechRequest, TextToSpeech, VoiceError,
};
use colored::Colorize;
use tracing::debug;

/// Prints every prompt the session reads out
pub struct ConsoleSpeaker;

#[async_trait]
impl TextToSpeech for ConsoleSpeaker {
    async fn speak(&self, request: SpeechRequest) -> VoiceResult<()> {
        println!(
            "{} {} {}",
            "🔊".bright_magenta(),
            format!("[{}]", request.language).dimmed(),
            request.text.italic()
        );
        Ok(())
    }
}

/// Queue of typed utterances standing in for a microphone
#[derive(Clone, Default)]
pub struct TranscriptFeed {
    pending: Arc<Mutex<VecDeque<String>>>,
}

impl TranscriptFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, utterance: impl Into<String>) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.push_back(utterance.into());
        }
    }

    fn pop(&self) -> Option<String> {
        self.pending.lock().ok().and_then(|mut p| p.pop_front())
    }
}

struct FeedSession {
    utterance: Option<String>,
}

#[async_trait]
impl RecognitionSession for FeedSession {
    async fn outcome(&mut self) -> RecognitionEvent {
        match self.utterance.take() {
            Some(text) => RecognitionEvent::Result(RecognitionResult::single(text)),
            None => RecognitionEvent::Ended,
        }
    }

    fn stop(&mut self) -> VoiceResult<()> {
        self.utterance = None;
        Ok(())
    }
}

#[async_trait]
impl SpeechRecognizer for TranscriptFeed {
    async fn start(&self, config: RecognitionConfig) -> VoiceResult<Box<dyn RecognitionSession>> {
        if config.continuous {
            return Err(VoiceError::StartFailed(
                "continuous recognition is not available in the terminal".to_string(),
            ));
        }
        debug!("Transcript feed listening ({})", config.language);
        Ok(Box::new(FeedSession {
            utterance: self.pop(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use booking_wizard::Locale;

    use super::*;

    #[tokio::test]
    async fn test_feed_hears_queued_utterances_in_order() {
        let feed = TranscriptFeed::new();
        feed.push("deux");
        feed.push("Grand Baie");

        let mut first = feed
            .start(RecognitionConfig::single_shot(Locale::Fr))
            .await
            .unwrap();
        assert_eq!(
            first.outcome().await,
            RecognitionEvent::Result(RecognitionResult::single("deux"))
        );

        let mut second = feed
            .start(RecognitionConfig::single_shot(Locale::Fr))
            .await
            .unwrap();
        assert_eq!(
            second.outcome().await,
            RecognitionEvent::Result(RecognitionResult::single("Grand Baie"))
        );

        let mut empty = feed
            .start(RecognitionConfig::single_shot(Locale::Fr))
            .await
            .unwrap();
        assert_eq!(empty.outcome().await, RecognitionEvent::Ended);
        assert!(empty.stop().is_ok());
    }
}
