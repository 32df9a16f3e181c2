//! Wizard state machine
//!
//! Walks the user through the steps of one booking type, holding the step
//! index, the answers collected so far and the one visible error.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;
use uuid::Uuid;

use crate::{
    catalog::{steps, BookingType, StepDefinition, StepKind, CHECK_IN, CHECK_OUT},
    form::{BookingForm, FieldValue, FormError, FormValues},
    locale::Locale,
    messages::Message,
    spoken::clamp_number,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error("A submission is in progress")]
    Busy,
}

pub type WizardResult<T> = std::result::Result<T, WizardError>;

/// A step answer that does not pass its step's rule
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid answer for '{key}': {message:?}")]
pub struct ValidationError {
    pub key: &'static str,
    pub message: Message,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPhase {
    Collecting,
    /// The completed form has been handed off and no edits are accepted
    Submitting,
}

/// Result of trying to move forward
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Moved { index: usize },
    Invalid(Message),
    Ready(BookingForm),
}

#[derive(Debug, Clone)]
pub struct BookingWizard {
    id: Uuid,
    booking_type: BookingType,
    locale: Locale,
    step_index: usize,
    hotel: FormValues,
    taxi: FormValues,
    active_error: Option<Message>,
    /// Steps accepted without their checks, see `advance_trusted`
    trusted: HashSet<&'static str>,
    listening: bool,
    phase: WizardPhase,
}

impl BookingWizard {
    pub fn new(booking_type: BookingType, locale: Locale) -> Self {
        Self {
            id: Uuid::new_v4(),
            booking_type,
            locale,
            step_index: 0,
            hotel: FormValues::initial(BookingType::Hotel),
            taxi: FormValues::initial(BookingType::Taxi),
            active_error: None,
            trusted: HashSet::new(),
            listening: false,
            phase: WizardPhase::Collecting,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn booking_type(&self) -> BookingType {
        self.booking_type
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn steps(&self) -> &'static [StepDefinition] {
        steps(self.booking_type, self.locale)
    }

    pub fn current_step(&self) -> &'static StepDefinition {
        &self.steps()[self.step_index]
    }

    pub fn is_last_step(&self) -> bool {
        self.step_index + 1 == self.steps().len()
    }

    /// Answers of the active booking type
    pub fn values(&self) -> &FormValues {
        match self.booking_type {
            BookingType::Hotel => &self.hotel,
            BookingType::Taxi => &self.taxi,
        }
    }

    fn values_mut(&mut self) -> &mut FormValues {
        match self.booking_type {
            BookingType::Hotel => &mut self.hotel,
            BookingType::Taxi => &mut self.taxi,
        }
    }

    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        self.values().get(key)
    }

    pub fn current_value(&self) -> Option<&FieldValue> {
        self.value(self.current_step().key)
    }

    pub fn active_error(&self) -> Option<&Message> {
        self.active_error.as_ref()
    }

    pub fn show_error(&mut self, message: Message) {
        self.active_error = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.active_error = None;
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn set_listening(&mut self, listening: bool) {
        self.listening = listening;
    }

    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == WizardPhase::Submitting
    }

    fn ensure_collecting(&self) -> WizardResult<()> {
        match self.phase {
            WizardPhase::Collecting => Ok(()),
            WizardPhase::Submitting => Err(WizardError::Busy),
        }
    }

    /// Overwrite one answer. Clears the visible error only when `key` is the current step.
    pub fn set_field(&mut self, key: &str, value: impl Into<FieldValue>) -> WizardResult<()> {
        self.ensure_collecting()?;
        self.values_mut().set(key, value.into())?;
        self.trusted.remove(key);
        if key == self.current_step().key {
            self.active_error = None;
        }
        Ok(())
    }

    /// Step a number answer up or down by `delta`, staying inside the step's bounds.
    /// Returns the new value, or `None` on non-number steps.
    pub fn nudge(&mut self, delta: i64) -> WizardResult<Option<i64>> {
        self.ensure_collecting()?;
        let step = self.current_step();
        if !step.is_number() {
            return Ok(None);
        }

        let (min, max) = step.bounds();
        let next = match self.current_value().and_then(FieldValue::as_decimal) {
            Some(n) => clamp_number((n.trunc() as i64).saturating_add(delta), min, max),
            None => min,
        };
        self.set_field(step.key, next)?;
        Ok(Some(next))
    }

    /// Check the current step's answer without touching any state
    pub fn check_step(&self) -> Result<(), ValidationError> {
        self.check(self.current_step())
    }

    fn check(&self, step: &'static StepDefinition) -> Result<(), ValidationError> {
        let invalid = |message| ValidationError {
            key: step.key,
            message,
        };

        if step.key == CHECK_OUT {
            if let Some(message) = checkout_order_error(self.values()) {
                return Err(invalid(message));
            }
        }
        check_value(step, self.value(step.key)).map_err(invalid)
    }

    /// Move forward if the current answer is valid; on the last step, confirm
    pub fn advance(&mut self) -> WizardResult<StepOutcome> {
        self.ensure_collecting()?;
        if let Err(e) = self.check_step() {
            debug!("Step '{}' blocked", e.key);
            self.active_error = Some(e.message.clone());
            return Ok(StepOutcome::Invalid(e.message));
        }
        self.active_error = None;
        self.step_forward()
    }

    /// Move forward without re-checking the current answer. The answer stays
    /// accepted at confirm time until the step is written again.
    pub fn advance_trusted(&mut self) -> WizardResult<StepOutcome> {
        self.ensure_collecting()?;
        self.active_error = None;
        self.trusted.insert(self.current_step().key);
        self.step_forward()
    }

    fn step_forward(&mut self) -> WizardResult<StepOutcome> {
        if self.is_last_step() {
            return self.confirm();
        }
        self.step_index += 1;
        debug!(
            "Wizard {} moved to step {} ('{}')",
            self.id,
            self.step_index,
            self.current_step().key
        );
        Ok(StepOutcome::Moved {
            index: self.step_index,
        })
    }

    /// Move back one step. Returns whether the step changed.
    pub fn back(&mut self) -> WizardResult<bool> {
        self.ensure_collecting()?;
        self.active_error = None;
        if self.step_index == 0 {
            return Ok(false);
        }
        self.step_index -= 1;
        Ok(true)
    }

    /// Check every step in order and hand off. The first failing step
    /// becomes current with its error shown; on success the wizard enters
    /// its submitting phase and the typed form is returned.
    ///
    /// The check-out order and number rules always run. Text, date and time
    /// answers accepted through `advance_trusted` are not re-checked.
    pub fn confirm(&mut self) -> WizardResult<StepOutcome> {
        self.ensure_collecting()?;
        self.active_error = None;

        let failing = self.steps().iter().enumerate().find_map(|(index, step)| {
            let trusted = self.trusted.contains(step.key) && !step.is_number();
            match self.check(step) {
                Err(e) if e.message == Message::CheckoutAfterCheckin || !trusted => {
                    Some((index, e))
                }
                _ => None,
            }
        });
        if let Some((index, e)) = failing {
            debug!("Confirm blocked at step '{}'", e.key);
            self.step_index = index;
            self.active_error = Some(e.message.clone());
            return Ok(StepOutcome::Invalid(e.message));
        }

        let form = BookingForm::from_values(self.values())?;
        self.phase = WizardPhase::Submitting;
        debug!("Wizard {} handed off a {} booking", self.id, self.booking_type);
        Ok(StepOutcome::Ready(form))
    }

    /// Accept edits again after a failed submission
    pub fn resume_collecting(&mut self) {
        self.phase = WizardPhase::Collecting;
    }

    /// Switch flows. Each flow keeps its own answers.
    pub fn switch_booking_type(&mut self, booking_type: BookingType) {
        if booking_type == self.booking_type {
            return;
        }
        self.booking_type = booking_type;
        self.reset_position();
    }

    pub fn set_locale(&mut self, locale: Locale) {
        if locale == self.locale {
            return;
        }
        self.locale = locale;
        self.reset_position();
    }

    fn reset_position(&mut self) {
        self.step_index = 0;
        self.active_error = None;
    }
}

/// The step's own rule, ignoring cross-field checks
fn check_value(step: &StepDefinition, value: Option<&FieldValue>) -> Result<(), Message> {
    match step.kind {
        StepKind::Text => {
            if step.optional {
                return Ok(());
            }
            let text = value.map(FieldValue::as_text).unwrap_or_default();
            let text = text.trim();
            if text.is_empty() {
                return Err(Message::EnterValue);
            }
            let min = step.min_len.unwrap_or(1);
            if text.chars().count() < min {
                return Err(Message::MinChars { min });
            }
            Ok(())
        }
        StepKind::Date | StepKind::Time => match value {
            Some(v) if !v.is_blank() => Ok(()),
            _ => Err(Message::SelectValue),
        },
        StepKind::Number => {
            let Some(n) = value.and_then(FieldValue::as_decimal) else {
                return Err(Message::EnterNumber);
            };
            if step.whole && n.fract() != 0.0 {
                return Err(Message::WholeNumber);
            }
            let min = step.min.unwrap_or(i64::MIN);
            let max = step.max.unwrap_or(i64::MAX);
            if n < min as f64 || n > max as f64 {
                return Err(Message::Between { min, max });
            }
            Ok(())
        }
    }
}

/// Check-out must be strictly later than check-in when both are readable dates
fn checkout_order_error(values: &FormValues) -> Option<Message> {
    let check_in = values.get(CHECK_IN).and_then(|v| parse_date(&v.as_text()))?;
    let check_out = values.get(CHECK_OUT).and_then(|v| parse_date(&v.as_text()))?;
    if check_out > check_in {
        None
    } else {
        Some(Message::CheckoutAfterCheckin)
    }
}

fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.naive_utc())
}
