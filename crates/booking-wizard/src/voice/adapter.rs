//! Voice input adapter
//!
//! Owns at most one recognition session and turns what it hears into a
//! typed answer for the current step.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{
    RecognitionConfig, RecognitionEvent, RecognitionSession, SpeechRecognizer, VoiceError,
};
use crate::{
    catalog::StepDefinition,
    form::FieldValue,
    locale::Locale,
    messages::Message,
    spoken::{clamp_number, spoken_to_number},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Idle,
    Listening,
}

/// What a voice attempt produced for the current step
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceOutcome {
    Value(FieldValue),
    Empty,
    NotANumber,
    Unsupported,
    Failed(VoiceError),
}

impl VoiceOutcome {
    /// Message to show when the attempt produced no value
    pub fn message(&self) -> Option<Message> {
        match self {
            VoiceOutcome::Value(_) => None,
            VoiceOutcome::Empty => Some(Message::DidntCatch),
            VoiceOutcome::NotANumber => Some(Message::SayNumber),
            VoiceOutcome::Unsupported => Some(Message::VoiceUnsupported),
            VoiceOutcome::Failed(_) => Some(Message::VoiceFailed),
        }
    }
}

/// Interpret a transcript for a step: numbers are parsed and clamped,
/// everything else is taken verbatim after trimming
pub fn interpret_transcript(transcript: &str, step: &StepDefinition) -> VoiceOutcome {
    let clean = transcript.trim();
    if clean.is_empty() {
        return VoiceOutcome::Empty;
    }

    if step.is_number() {
        return match spoken_to_number(clean) {
            Some(n) => {
                let (min, max) = step.bounds();
                VoiceOutcome::Value(FieldValue::Number(clamp_number(n, min, max)))
            }
            None => VoiceOutcome::NotANumber,
        };
    }

    VoiceOutcome::Value(FieldValue::Text(clean.to_string()))
}

/// A live recognition session that is always stopped when released
struct ActiveSession {
    session: Box<dyn RecognitionSession>,
}

impl Drop for ActiveSession {
    fn drop(&mut self) {
        if let Err(e) = self.session.stop() {
            debug!("Ignoring error while stopping recognition: {}", e);
        }
    }
}

pub struct VoiceInputAdapter {
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    active: Option<ActiveSession>,
    state: VoiceState,
}

impl VoiceInputAdapter {
    /// `None` means the host has no speech recognition
    pub fn new(recognizer: Option<Arc<dyn SpeechRecognizer>>) -> Self {
        Self {
            recognizer,
            active: None,
            state: VoiceState::Idle,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    /// Listen for one utterance and interpret it for `step`
    pub async fn listen(&mut self, locale: Locale, step: &StepDefinition) -> VoiceOutcome {
        let Some(recognizer) = self.recognizer.clone() else {
            debug!("Voice requested but no recognizer is available");
            return VoiceOutcome::Unsupported;
        };

        if self.active.take().is_some() {
            debug!("Stopped a lingering recognition session");
        }

        let session = match recognizer.start(RecognitionConfig::single_shot(locale)).await {
            Ok(session) => session,
            Err(VoiceError::Unsupported) => {
                self.state = VoiceState::Idle;
                return VoiceOutcome::Unsupported;
            }
            Err(e) => {
                warn!("Voice start failed: {}", e);
                self.state = VoiceState::Idle;
                return VoiceOutcome::Failed(e);
            }
        };

        info!(
            "Listening for '{}' ({})",
            step.key,
            locale.language_tag()
        );
        self.state = VoiceState::Listening;
        let active = self.active.insert(ActiveSession { session });
        let event = active.session.outcome().await;

        self.active = None;
        self.state = VoiceState::Idle;

        match event {
            RecognitionEvent::Result(result) => {
                let transcript = result.first_transcript().unwrap_or_default();
                debug!("Heard '{}' for '{}'", transcript, step.key);
                interpret_transcript(transcript, step)
            }
            RecognitionEvent::Error(e) => {
                warn!("Voice error: {}", e);
                VoiceOutcome::Failed(e)
            }
            RecognitionEvent::Ended => {
                warn!("Voice session ended without a result");
                VoiceOutcome::Failed(VoiceError::EndedWithoutResult)
            }
        }
    }

    /// Stop any active session. Safe to call at any time.
    pub fn shutdown(&mut self) {
        if self.active.take().is_some() {
            debug!("Voice session stopped on teardown");
        }
        self.state = VoiceState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    use async_trait::async_trait;

    use super::*;
    use crate::{
        catalog::{steps, BookingType},
        voice::{RecognitionResult, VoiceResult},
    };

    struct ScriptedSession {
        event: Option<RecognitionEvent>,
        stops: Arc<AtomicUsize>,
        fail_stop: bool,
    }

    #[async_trait]
    impl RecognitionSession for ScriptedSession {
        async fn outcome(&mut self) -> RecognitionEvent {
            self.event.take().unwrap_or(RecognitionEvent::Ended)
        }

        fn stop(&mut self) -> VoiceResult<()> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            if self.fail_stop {
                Err(VoiceError::StopFailed("already stopped".to_string()))
            } else {
                Ok(())
            }
        }
    }

    struct ScriptedRecognizer {
        events: Mutex<Vec<RecognitionEvent>>,
        stops: Arc<AtomicUsize>,
        configs: Mutex<Vec<RecognitionConfig>>,
        fail_stop: bool,
    }

    impl ScriptedRecognizer {
        fn new(events: Vec<RecognitionEvent>) -> Self {
            Self {
                events: Mutex::new(events),
                stops: Arc::new(AtomicUsize::new(0)),
                configs: Mutex::new(Vec::new()),
                fail_stop: false,
            }
        }
    }

    #[async_trait]
    impl SpeechRecognizer for ScriptedRecognizer {
        async fn start(&self, config: RecognitionConfig) -> VoiceResult<Box<dyn RecognitionSession>> {
            self.configs.lock().unwrap().push(config);
            let event = self.events.lock().unwrap().pop();
            Ok(Box::new(ScriptedSession {
                event,
                stops: self.stops.clone(),
                fail_stop: self.fail_stop,
            }))
        }
    }

    fn step(booking_type: BookingType, key: &str) -> StepDefinition {
        steps(booking_type, Locale::En)
            .iter()
            .find(|s| s.key == key)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_interpret_number_step() {
        let rooms = step(BookingType::Hotel, "rooms");
        assert_eq!(
            interpret_transcript(" three rooms ", &rooms),
            VoiceOutcome::Value(FieldValue::Number(3))
        );
        assert_eq!(
            interpret_transcript("500", &rooms),
            VoiceOutcome::Value(FieldValue::Number(20))
        );
        assert_eq!(interpret_transcript("lots", &rooms), VoiceOutcome::NotANumber);
        assert_eq!(interpret_transcript("   ", &rooms), VoiceOutcome::Empty);
    }

    #[test]
    fn test_interpret_text_step_verbatim() {
        let area = step(BookingType::Hotel, "hotelNameOrArea");
        assert_eq!(
            interpret_transcript("  Grand Baie ", &area),
            VoiceOutcome::Value(FieldValue::from("Grand Baie"))
        );
    }

    #[tokio::test]
    async fn test_unsupported_without_recognizer() {
        let mut adapter = VoiceInputAdapter::new(None);
        let outcome = adapter
            .listen(Locale::En, &step(BookingType::Taxi, "pickupLocation"))
            .await;
        assert_eq!(outcome, VoiceOutcome::Unsupported);
        assert_eq!(outcome.message(), Some(Message::VoiceUnsupported));
        assert_eq!(adapter.state(), VoiceState::Idle);
    }

    #[tokio::test]
    async fn test_listen_uses_locale_and_stops_session() {
        let recognizer = Arc::new(ScriptedRecognizer::new(vec![RecognitionEvent::Result(
            RecognitionResult::single("deux"),
        )]));
        let mut adapter = VoiceInputAdapter::new(Some(recognizer.clone()));

        let outcome = adapter
            .listen(Locale::Fr, &step(BookingType::Taxi, "passengers"))
            .await;

        assert_eq!(outcome, VoiceOutcome::Value(FieldValue::Number(2)));
        assert_eq!(adapter.state(), VoiceState::Idle);
        assert_eq!(recognizer.stops.load(Ordering::SeqCst), 1);

        let configs = recognizer.configs.lock().unwrap();
        assert_eq!(configs[0], RecognitionConfig::single_shot(Locale::Fr));
        assert!(!configs[0].continuous && !configs[0].interim_results);
    }

    #[tokio::test]
    async fn test_recognition_error_reports_failure() {
        let mut recognizer = ScriptedRecognizer::new(vec![RecognitionEvent::Error(
            VoiceError::Recognition("network".to_string()),
        )]);
        recognizer.fail_stop = true;
        let recognizer = Arc::new(recognizer);
        let mut adapter = VoiceInputAdapter::new(Some(recognizer.clone()));

        let outcome = adapter
            .listen(Locale::En, &step(BookingType::Hotel, "checkIn"))
            .await;

        assert_eq!(outcome.message(), Some(Message::VoiceFailed));
        assert_eq!(adapter.state(), VoiceState::Idle);
        // A failing stop is swallowed.
        assert_eq!(recognizer.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_session_ending_without_result_fails() {
        let recognizer = Arc::new(ScriptedRecognizer::new(vec![RecognitionEvent::Ended]));
        let mut adapter = VoiceInputAdapter::new(Some(recognizer));
        let outcome = adapter
            .listen(Locale::En, &step(BookingType::Hotel, "checkIn"))
            .await;
        assert_eq!(outcome, VoiceOutcome::Failed(VoiceError::EndedWithoutResult));
    }
}
