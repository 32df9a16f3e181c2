//! # Booking Wizard
//!
//! Step-driven collection of hotel and taxi bookings. Answers can be typed or
//! spoken (English or French), are validated step by step, and the completed
//! form is handed to a pluggable submission function with retry support.

pub mod catalog;
pub mod config;
pub mod form;
pub mod locale;
pub mod messages;
pub mod session;
pub mod spoken;
pub mod submission;
pub mod voice;
pub mod wizard;

#[cfg(test)]
mod wizard_tests;

pub use catalog::{steps, BookingType, StepDefinition, StepKind};
pub use config::{VoiceAnswerPolicy, WizardConfig};
pub use form::{BookingForm, FieldValue, FormError, FormValues, HotelBooking, TaxiBooking};
pub use locale::Locale;
pub use messages::{Message, UiText};
pub use session::{BookingSession, SessionEvent, WizardView};
pub use spoken::{clamp, normalize, spoken_to_number};
pub use submission::{
    BookingReceipt, BookingSubmitter, CalendarOutcome, Confirmation, CoordinatorError,
    EmailOutcome, FailureNotice, FollowUpAction, SubmissionCoordinator, SubmissionError,
    SubmissionOutcome, SubmissionPhase,
};
pub use voice::{
    RecognitionConfig, RecognitionEvent, RecognitionResult, RecognitionSession,
    SpeechRecognizer, SpeechRequest, TextToSpeech, VoiceError, VoiceInputAdapter, VoiceOutcome,
};
pub use wizard::{BookingWizard, StepOutcome, ValidationError, WizardError, WizardPhase};

/// Main error type for booking operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("No booking wizard is open")]
    NoActiveWizard,

    #[error("The booking is being submitted")]
    WizardBusy,

    #[error("Form error: {0}")]
    Form(#[from] FormError),

    #[error("Voice error: {0}")]
    Voice(#[from] VoiceError),

    #[error("Submission error: {0}")]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),
}

impl From<WizardError> for BookingError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::Form(e) => BookingError::Form(e),
            WizardError::Busy => BookingError::WizardBusy,
        }
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;
