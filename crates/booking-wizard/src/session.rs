//! Booking session
//!
//! Wires the wizard, the voice adapter, the speech sink and the submission
//! coordinator together the way the chat page drives them. The session is the
//! only writer of wizard state; every operation takes `&mut self`, so a voice
//! answer is always applied and advanced before any other edit can run.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    catalog::{BookingType, StepKind},
    config::{VoiceAnswerPolicy, WizardConfig},
    form::BookingForm,
    locale::Locale,
    messages::{Message, UiText},
    submission::{
        BookingSubmitter, Confirmation, FailureNotice, SubmissionCoordinator, SubmissionOutcome,
    },
    voice::{SpeechRecognizer, SpeechRequest, TextToSpeech, VoiceInputAdapter, VoiceOutcome},
    wizard::{BookingWizard, StepOutcome},
    BookingError, Result,
};

/// What an operation changed, for the host to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The wizard now shows the step at `index`
    StepChanged { index: usize },
    /// A validation or voice message is now visible on the current step
    Notice(Message),
    /// The booking went through and the wizard has closed
    Confirmed(Confirmation),
    /// The booking failed; the reason is visible and a retry is offered
    SubmissionFailed(FailureNotice),
    /// The wizard was closed without submitting
    Closed,
    Unchanged,
}

/// Render-ready snapshot of the open wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardView {
    pub booking_type: BookingType,
    pub title: &'static str,
    pub progress: String,
    pub key: &'static str,
    pub label: &'static str,
    pub kind: StepKind,
    pub placeholder: Option<&'static str>,
    pub value: String,
    pub error: Option<String>,
    /// Whether the visible error is a failed submission that can be retried
    pub can_retry: bool,
    pub can_go_back: bool,
    pub is_last_step: bool,
    pub listening: bool,
    pub submitting: bool,
    pub primary_label: &'static str,
    pub voice_label: &'static str,
}

pub struct BookingSession {
    config: WizardConfig,
    wizard: Option<BookingWizard>,
    coordinator: Arc<SubmissionCoordinator>,
    voice: VoiceInputAdapter,
    speaker: Option<Arc<dyn TextToSpeech>>,
    submission_error: Option<String>,
}

impl BookingSession {
    pub fn new(config: WizardConfig, submitter: Arc<dyn BookingSubmitter>) -> Self {
        Self {
            config,
            wizard: None,
            coordinator: Arc::new(SubmissionCoordinator::new(submitter)),
            voice: VoiceInputAdapter::new(None),
            speaker: None,
            submission_error: None,
        }
    }

    pub fn with_recognizer(mut self, recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        self.voice = VoiceInputAdapter::new(Some(recognizer));
        self
    }

    pub fn with_speaker(mut self, speaker: Arc<dyn TextToSpeech>) -> Self {
        self.speaker = Some(speaker);
        self
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn locale(&self) -> Locale {
        self.config.locale
    }

    pub fn ui(&self) -> UiText {
        UiText::new(self.config.locale)
    }

    pub fn is_muted(&self) -> bool {
        self.config.muted
    }

    pub fn voice_supported(&self) -> bool {
        self.voice.is_supported()
    }

    pub fn wizard(&self) -> Option<&BookingWizard> {
        self.wizard.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.wizard.is_some()
    }

    pub fn coordinator(&self) -> &Arc<SubmissionCoordinator> {
        &self.coordinator
    }

    fn wizard_mut(&mut self) -> Result<&mut BookingWizard> {
        self.wizard.as_mut().ok_or(BookingError::NoActiveWizard)
    }

    /// Open the wizard on `booking_type`. An open wizard switches flow and
    /// keeps the answers of both flows; reopening the open flow stays put.
    pub async fn open(&mut self, booking_type: BookingType) -> Result<SessionEvent> {
        let index = match self.wizard.as_mut() {
            Some(wizard) => {
                if wizard.is_submitting() {
                    return Err(BookingError::WizardBusy);
                }
                wizard.switch_booking_type(booking_type);
                wizard.step_index()
            }
            None => {
                let wizard = BookingWizard::new(booking_type, self.config.locale);
                info!("Opened {} booking wizard {}", booking_type, wizard.id());
                self.coordinator.begin_session(wizard.id()).await;
                self.submission_error = None;
                self.wizard = Some(wizard);
                0
            }
        };
        self.speak_prompt().await;
        Ok(SessionEvent::StepChanged { index })
    }

    /// Close the wizard and drop everything it collected. An in-flight
    /// submission is not cancelled, but its result will be discarded.
    pub async fn cancel(&mut self) -> SessionEvent {
        self.voice.shutdown();
        self.submission_error = None;
        match self.wizard.take() {
            Some(wizard) => {
                info!("Closed booking wizard {}", wizard.id());
                self.coordinator.close_session().await;
                SessionEvent::Closed
            }
            None => SessionEvent::Unchanged,
        }
    }

    /// Write a typed answer to the current step
    pub fn type_answer(&mut self, answer: &str) -> Result<()> {
        let wizard = self.wizard_mut()?;
        let key = wizard.current_step().key;
        wizard.set_field(key, answer)?;
        Ok(())
    }

    /// Step the current number answer by `delta`
    pub fn nudge(&mut self, delta: i64) -> Result<Option<i64>> {
        Ok(self.wizard_mut()?.nudge(delta)?)
    }

    pub async fn next(&mut self) -> Result<SessionEvent> {
        let outcome = self.wizard_mut()?.advance()?;
        self.apply(outcome).await
    }

    pub async fn back(&mut self) -> Result<SessionEvent> {
        let wizard = self.wizard_mut()?;
        if !wizard.back()? {
            return Ok(SessionEvent::Unchanged);
        }
        let index = wizard.step_index();
        self.speak_prompt().await;
        Ok(SessionEvent::StepChanged { index })
    }

    /// Confirm from any step, running the final cross-field checks
    pub async fn confirm(&mut self) -> Result<SessionEvent> {
        let outcome = self.wizard_mut()?.confirm()?;
        self.apply(outcome).await
    }

    /// Listen for one spoken answer to the current step. The answer is
    /// written, then the wizard advances after the settle delay.
    pub async fn answer_by_voice(&mut self) -> Result<SessionEvent> {
        let wizard = self.wizard.as_mut().ok_or(BookingError::NoActiveWizard)?;
        if wizard.is_submitting() {
            return Err(BookingError::WizardBusy);
        }
        let step = wizard.current_step();
        let locale = wizard.locale();

        wizard.set_listening(true);
        let outcome = self.voice.listen(locale, step).await;
        let wizard = self.wizard_mut()?;
        wizard.set_listening(false);

        let value = match outcome {
            VoiceOutcome::Value(value) => value,
            other => {
                let message = other.message().unwrap_or(Message::VoiceFailed);
                wizard.show_error(message.clone());
                return Ok(SessionEvent::Notice(message));
            }
        };

        wizard.set_field(step.key, value)?;
        tokio::time::sleep(self.config.settle_delay()).await;

        let policy = self.config.voice_answers;
        let wizard = self.wizard_mut()?;
        let outcome = match policy {
            VoiceAnswerPolicy::Validate => wizard.advance()?,
            VoiceAnswerPolicy::Trust => wizard.advance_trusted()?,
        };
        self.apply(outcome).await
    }

    /// Resend the last payload. Works after the wizard has closed too.
    pub async fn retry(&mut self) -> Result<SessionEvent> {
        if let Some(wizard) = self.wizard.as_mut() {
            wizard.clear_error();
        }
        let outcome = self.coordinator.retry(self.config.locale).await?;
        self.settle_submission(outcome).await
    }

    /// Switch the display locale; an open wizard restarts from its first step
    pub async fn set_locale(&mut self, locale: Locale) -> SessionEvent {
        if locale == self.config.locale {
            return SessionEvent::Unchanged;
        }
        info!("Display locale switched to {}", locale);
        self.config.locale = locale;
        match self.wizard.as_mut() {
            Some(wizard) => {
                wizard.set_locale(locale);
                self.speak_prompt().await;
                SessionEvent::StepChanged { index: 0 }
            }
            None => SessionEvent::Unchanged,
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.config.muted = muted;
    }

    /// Snapshot of the open wizard, or `None` when it is closed
    pub fn view(&self) -> Option<WizardView> {
        let wizard = self.wizard.as_ref()?;
        let ui = UiText::new(wizard.locale());
        let step = wizard.current_step();
        let active_error = wizard.active_error().map(|m| m.render(wizard.locale()));
        let can_retry = active_error.is_none() && self.submission_error.is_some();

        let primary_label = if wizard.is_submitting() {
            ui.confirming()
        } else if wizard.is_last_step() {
            ui.confirm_booking()
        } else {
            ui.next()
        };

        Some(WizardView {
            booking_type: wizard.booking_type(),
            title: ui.title(wizard.booking_type()),
            progress: ui.step_of(wizard.step_index() + 1, wizard.steps().len()),
            key: step.key,
            label: step.label,
            kind: step.kind,
            placeholder: step.placeholder,
            value: wizard
                .current_value()
                .map(|v| v.as_text())
                .unwrap_or_default(),
            error: active_error.or_else(|| self.submission_error.clone()),
            can_retry,
            can_go_back: wizard.step_index() > 0,
            is_last_step: wizard.is_last_step(),
            listening: wizard.is_listening(),
            submitting: wizard.is_submitting(),
            primary_label,
            voice_label: if wizard.is_listening() {
                ui.listening()
            } else {
                ui.answer_by_voice()
            },
        })
    }

    async fn apply(&mut self, outcome: StepOutcome) -> Result<SessionEvent> {
        match outcome {
            StepOutcome::Moved { index } => {
                self.speak_prompt().await;
                Ok(SessionEvent::StepChanged { index })
            }
            StepOutcome::Invalid(message) => Ok(SessionEvent::Notice(message)),
            StepOutcome::Ready(form) => self.submit(form).await,
        }
    }

    async fn submit(&mut self, form: BookingForm) -> Result<SessionEvent> {
        self.submission_error = None;
        let outcome = match self.coordinator.submit(form, self.config.locale).await {
            Ok(outcome) => outcome,
            Err(e) => {
                if let Some(wizard) = self.wizard.as_mut() {
                    wizard.resume_collecting();
                }
                return Err(e.into());
            }
        };
        self.settle_submission(outcome).await
    }

    async fn settle_submission(&mut self, outcome: SubmissionOutcome) -> Result<SessionEvent> {
        match outcome {
            SubmissionOutcome::Confirmed(confirmation) => {
                self.voice.shutdown();
                self.submission_error = None;
                if let Some(wizard) = self.wizard.take() {
                    info!("Booking wizard {} completed", wizard.id());
                    self.coordinator.close_session().await;
                }
                self.speak(&confirmation.spoken).await;
                Ok(SessionEvent::Confirmed(confirmation))
            }
            SubmissionOutcome::Failed(notice) => {
                if let Some(wizard) = self.wizard.as_mut() {
                    wizard.resume_collecting();
                }
                self.submission_error = Some(notice.reason.clone());
                Ok(SessionEvent::SubmissionFailed(notice))
            }
            SubmissionOutcome::Discarded => {
                debug!("Submission result discarded");
                Ok(SessionEvent::Unchanged)
            }
        }
    }

    async fn speak_prompt(&self) {
        if let Some(label) = self.wizard.as_ref().map(|w| w.current_step().label) {
            self.speak(label).await;
        }
    }

    async fn speak(&self, text: &str) {
        if self.config.muted || text.is_empty() {
            return;
        }
        let Some(speaker) = self.speaker.as_ref() else {
            return;
        };
        if let Err(e) = speaker
            .speak(SpeechRequest::new(text, self.config.locale))
            .await
        {
            warn!("Prompt read-out failed: {}", e);
        }
    }
}
