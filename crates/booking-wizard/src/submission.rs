//! Submission coordination
//!
//! Sends a completed booking to the external booking service, keeps the last
//! payload for retries and turns the service's answer into chat follow-ups.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{form::BookingForm, locale::Locale, messages::UiText};

/// Human-readable reason a submission failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct SubmissionError(pub String);

impl SubmissionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordinatorError {
    #[error("A booking submission is already in progress")]
    AlreadySubmitting,

    #[error("There is no booking to retry")]
    NothingToRetry,
}

/// Email delivery result reported by the booking service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailOutcome {
    #[serde(default = "default_true")]
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for EmailOutcome {
    fn default() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }
}

/// Calendar sync result reported by the booking service
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarOutcome {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub html_link: Option<String>,
}

/// Stored booking record, only read for its external link
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookingRecord {
    #[serde(default)]
    pub external_link: Option<String>,
}

/// Successful response of the booking service
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReceipt {
    #[serde(default)]
    pub external_link: Option<String>,
    #[serde(default)]
    pub qr_url: Option<String>,
    #[serde(default)]
    pub email: EmailOutcome,
    #[serde(default)]
    pub calendar: Option<CalendarOutcome>,
    #[serde(default)]
    pub booking: Option<BookingRecord>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl BookingReceipt {
    /// Continuation link, falling back to the stored booking's link
    pub fn continuation_link(&self) -> Option<&str> {
        non_empty(&self.external_link).or_else(|| {
            self.booking
                .as_ref()
                .and_then(|record| non_empty(&record.external_link))
        })
    }

    pub fn calendar_link(&self) -> Option<&str> {
        self.calendar
            .as_ref()
            .filter(|calendar| calendar.ok)
            .and_then(|calendar| non_empty(&calendar.html_link))
    }

    pub fn calendar_synced(&self) -> bool {
        self.calendar.as_ref().is_some_and(|calendar| calendar.ok)
    }
}

/// Booking submission function provided by the host
#[async_trait]
pub trait BookingSubmitter: Send + Sync {
    async fn submit(
        &self,
        form: &BookingForm,
        locale: Locale,
    ) -> Result<BookingReceipt, SubmissionError>;
}

/// Follow-up the chat offers after a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FollowUpAction {
    OpenLink { label: String, url: String },
    OpenCalendar { label: String, url: String },
    RetryBooking { label: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    pub text: String,
    pub actions: Vec<FollowUpAction>,
    pub qr_url: Option<String>,
    /// Short line for the speech sink
    pub spoken: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureNotice {
    /// Shown inline in the wizard and as a transient notification
    pub reason: String,
    /// Chat message body
    pub text: String,
    pub actions: Vec<FollowUpAction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Confirmed(Confirmation),
    Failed(FailureNotice),
    /// The session that started the submission was closed before it finished
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionState {
    pub phase: SubmissionPhase,
    pub last_payload: Option<BookingForm>,
    pub last_error: Option<String>,
    session: Option<Uuid>,
}

impl SubmissionState {
    fn new(session: Option<Uuid>) -> Self {
        Self {
            phase: SubmissionPhase::Idle,
            last_payload: None,
            last_error: None,
            session,
        }
    }
}

/// Compose the chat confirmation for a successful booking
pub fn compose_confirmation(receipt: &BookingReceipt, locale: Locale) -> Confirmation {
    let ui = UiText::new(locale);
    let link = receipt.continuation_link();

    let mut text = if receipt.email.ok {
        ui.confirmed_email_ok().to_string()
    } else {
        ui.confirmed_email_failed().to_string()
    };
    if link.is_some() {
        text.push('\n');
        text.push_str(ui.use_link_or_qr());
    }
    if receipt.calendar_synced() {
        text.push('\n');
        text.push_str(ui.calendar_synced());
    }
    if !receipt.email.ok {
        if let Some(error) = non_empty(&receipt.email.error) {
            text.push_str("\n\n");
            text.push_str(&ui.email_error(error));
        }
    }

    let mut actions = Vec::new();
    if let Some(url) = link {
        actions.push(FollowUpAction::OpenLink {
            label: ui.open_booking().to_string(),
            url: url.to_string(),
        });
    }
    if let Some(url) = receipt.calendar_link() {
        actions.push(FollowUpAction::OpenCalendar {
            label: ui.calendar_synced().to_string(),
            url: url.to_string(),
        });
    }

    Confirmation {
        text,
        actions,
        qr_url: non_empty(&receipt.qr_url).map(str::to_string),
        spoken: ui.booking_confirmed_spoken().to_string(),
    }
}

/// Compose the failure notice with its single retry action
pub fn compose_failure(error: &SubmissionError, locale: Locale) -> FailureNotice {
    let ui = UiText::new(locale);
    let reason = match error.0.trim() {
        "" => ui.submission_failed_default().to_string(),
        reason => reason.to_string(),
    };

    FailureNotice {
        reason,
        text: ui.submission_failed_notice().to_string(),
        actions: vec![FollowUpAction::RetryBooking {
            label: ui.retry_booking().to_string(),
        }],
    }
}

pub struct SubmissionCoordinator {
    submitter: Arc<dyn BookingSubmitter>,
    state: Arc<RwLock<SubmissionState>>,
}

impl SubmissionCoordinator {
    pub fn new(submitter: Arc<dyn BookingSubmitter>) -> Self {
        Self {
            submitter,
            state: Arc::new(RwLock::new(SubmissionState::new(None))),
        }
    }

    /// Start tracking a new wizard session; any earlier payload is forgotten
    pub async fn begin_session(&self, session: Uuid) {
        *self.state.write().await = SubmissionState::new(Some(session));
    }

    /// Detach from the current wizard session. The last payload stays
    /// available for a retry; an in-flight submission will be discarded.
    pub async fn close_session(&self) {
        let mut state = self.state.write().await;
        state.session = None;
        state.phase = SubmissionPhase::Idle;
        state.last_error = None;
    }

    pub async fn snapshot(&self) -> SubmissionState {
        self.state.read().await.clone()
    }

    pub async fn is_submitting(&self) -> bool {
        self.state.read().await.phase == SubmissionPhase::Submitting
    }

    pub async fn last_payload(&self) -> Option<BookingForm> {
        self.state.read().await.last_payload.clone()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.last_error.clone()
    }

    /// Submit a booking. A second call while one is outstanding is refused.
    pub async fn submit(
        &self,
        form: BookingForm,
        locale: Locale,
    ) -> Result<SubmissionOutcome, CoordinatorError> {
        let session = {
            let mut state = self.state.write().await;
            if state.phase == SubmissionPhase::Submitting {
                warn!("Refusing booking submission while another is in flight");
                return Err(CoordinatorError::AlreadySubmitting);
            }
            state.phase = SubmissionPhase::Submitting;
            state.last_payload = Some(form.clone());
            state.last_error = None;
            state.session
        };

        info!("Submitting {} booking ({})", form.booking_type(), locale);
        let result = self.submitter.submit(&form, locale).await;

        let mut state = self.state.write().await;
        if state.session != session {
            info!("Discarding booking result for a closed session");
            return Ok(SubmissionOutcome::Discarded);
        }

        match result {
            Ok(receipt) => {
                info!(
                    "Booking confirmed (email ok: {}, calendar synced: {})",
                    receipt.email.ok,
                    receipt.calendar_synced()
                );
                state.phase = SubmissionPhase::Succeeded;
                state.last_error = None;
                state.last_payload = None;
                Ok(SubmissionOutcome::Confirmed(compose_confirmation(
                    &receipt, locale,
                )))
            }
            Err(e) => {
                let notice = compose_failure(&e, locale);
                warn!("Booking submission failed: {}", notice.reason);
                state.phase = SubmissionPhase::Failed;
                state.last_error = Some(notice.reason.clone());
                Ok(SubmissionOutcome::Failed(notice))
            }
        }
    }

    /// Resend the cached payload unchanged
    pub async fn retry(&self, locale: Locale) -> Result<SubmissionOutcome, CoordinatorError> {
        let payload = self
            .last_payload()
            .await
            .ok_or(CoordinatorError::NothingToRetry)?;
        self.submit(payload, locale).await
    }
}
