//! Localized message table
//!
//! Every string the wizard shows or speaks lives here, once per locale.

use serde::{Deserialize, Serialize};

use crate::{catalog::BookingType, locale::Locale};

/// A user-facing message that is rendered in the active locale on demand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "camelCase")]
pub enum Message {
    EnterValue,
    MinChars { min: usize },
    SelectValue,
    EnterNumber,
    WholeNumber,
    Between { min: i64, max: i64 },
    CheckoutAfterCheckin,
    VoiceUnsupported,
    DidntCatch,
    SayNumber,
    VoiceFailed,
}

impl Message {
    pub fn render(&self, locale: Locale) -> String {
        match locale {
            Locale::En => match self {
                Message::EnterValue => "Please enter a value.".to_string(),
                Message::MinChars { min } => format!("Please enter at least {} characters.", min),
                Message::SelectValue => "Please select a value.".to_string(),
                Message::EnterNumber => "Please enter a number.".to_string(),
                Message::WholeNumber => "Please enter a whole number.".to_string(),
                Message::Between { min, max } => {
                    format!("Please enter a value between {} and {}.", min, max)
                }
                Message::CheckoutAfterCheckin => "Check-out must be after check-in.".to_string(),
                Message::VoiceUnsupported => {
                    "Voice input is not supported on this device.".to_string()
                }
                Message::DidntCatch => "I didn’t catch that. Please try again.".to_string(),
                Message::SayNumber => "Please say a number (e.g., “2”).".to_string(),
                Message::VoiceFailed => {
                    "Voice input failed. Please type your answer.".to_string()
                }
            },
            Locale::Fr => match self {
                Message::EnterValue => "Veuillez saisir une valeur.".to_string(),
                Message::MinChars { min } => {
                    format!("Veuillez saisir au moins {} caractères.", min)
                }
                Message::SelectValue => "Veuillez sélectionner une valeur.".to_string(),
                Message::EnterNumber => "Veuillez saisir un nombre.".to_string(),
                Message::WholeNumber => "Veuillez saisir un nombre entier.".to_string(),
                Message::Between { min, max } => {
                    format!("Veuillez entrer une valeur entre {} et {}.", min, max)
                }
                Message::CheckoutAfterCheckin => {
                    "La date de départ doit être après la date d’arrivée.".to_string()
                }
                Message::VoiceUnsupported => {
                    "La saisie vocale n’est pas prise en charge sur cet appareil.".to_string()
                }
                Message::DidntCatch => "Je n’ai pas compris. Réessayez.".to_string(),
                Message::SayNumber => "Veuillez dire un nombre (ex. « 2 »).".to_string(),
                Message::VoiceFailed => {
                    "La saisie vocale a échoué. Veuillez taper votre réponse.".to_string()
                }
            },
        }
    }
}

/// Fixed interface strings around the wizard and the submission flow
#[derive(Debug, Clone, Copy)]
pub struct UiText {
    locale: Locale,
}

impl UiText {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    fn pick(&self, en: &'static str, fr: &'static str) -> &'static str {
        match self.locale {
            Locale::En => en,
            Locale::Fr => fr,
        }
    }

    pub fn step_of(&self, index: usize, total: usize) -> String {
        match self.locale {
            Locale::En => format!("Step {} of {}", index, total),
            Locale::Fr => format!("Étape {} sur {}", index, total),
        }
    }

    pub fn title(&self, booking_type: BookingType) -> &'static str {
        match booking_type {
            BookingType::Hotel => self.pick("Hotel booking", "Réservation d’hôtel"),
            BookingType::Taxi => self.pick("Taxi booking", "Réservation de taxi"),
        }
    }

    pub fn next(&self) -> &'static str {
        self.pick("Next", "Suivant")
    }

    pub fn back(&self) -> &'static str {
        self.pick("Back", "Retour")
    }

    pub fn cancel(&self) -> &'static str {
        self.pick("Cancel", "Annuler")
    }

    pub fn answer_by_voice(&self) -> &'static str {
        self.pick("Answer by voice 🎙️", "Répondre par voix 🎙️")
    }

    pub fn listening(&self) -> &'static str {
        self.pick("Listening…", "Écoute…")
    }

    pub fn confirm_booking(&self) -> &'static str {
        self.pick("Confirm booking", "Confirmer")
    }

    pub fn confirming(&self) -> &'static str {
        self.pick("Confirming…", "Confirmation…")
    }

    pub fn confirming_status(&self) -> &'static str {
        self.pick(
            "Confirming your booking…",
            "Confirmation de votre réservation…",
        )
    }

    pub fn confirmed_email_ok(&self) -> &'static str {
        self.pick(
            "Booking confirmed. A confirmation email has been sent.",
            "Réservation confirmée. Un e-mail de confirmation a été envoyé.",
        )
    }

    pub fn confirmed_email_failed(&self) -> &'static str {
        self.pick(
            "Booking confirmed. Email could not be sent right now, please use the link/QR below.",
            "Réservation confirmée. L’e-mail n’a pas pu être envoyé pour le moment. Utilisez le lien/QR ci-dessous.",
        )
    }

    pub fn use_link_or_qr(&self) -> &'static str {
        self.pick(
            "Use the link below or scan the QR code.",
            "Utilisez le lien ci-dessous ou scannez le QR code.",
        )
    }

    pub fn open_booking(&self) -> &'static str {
        self.pick("Open booking link ↗", "Ouvrir le lien ↗")
    }

    pub fn calendar_synced(&self) -> &'static str {
        self.pick("Calendar synced ✅", "Agenda synchronisé ✅")
    }

    pub fn scan_to_continue(&self) -> &'static str {
        self.pick("Scan to continue", "Scanner pour continuer")
    }

    pub fn email_error(&self, error: &str) -> String {
        match self.locale {
            Locale::En => format!("Email error: {}", error),
            Locale::Fr => format!("Erreur e-mail : {}", error),
        }
    }

    pub fn booking_confirmed_spoken(&self) -> &'static str {
        self.pick("Booking confirmed.", "Réservation confirmée.")
    }

    pub fn retry_booking(&self) -> &'static str {
        self.pick("Retry booking 🔁", "Réessayer 🔁")
    }

    pub fn submission_failed_default(&self) -> &'static str {
        self.pick(
            "I couldn’t confirm the booking due to a network issue. Please try again.",
            "Je n’ai pas pu confirmer la réservation. Réessayez.",
        )
    }

    pub fn submission_failed_notice(&self) -> &'static str {
        self.pick(
            "I couldn’t confirm the booking right now.\nPlease check your connection (and that the server is running), then try again.",
            "Je ne peux pas confirmer la réservation pour le moment.\nVérifiez la connexion puis réessayez.",
        )
    }

    pub fn language_switched(&self) -> &'static str {
        self.pick(
            "Language switched to English 🇬🇧",
            "Langue changée : Français 🇫🇷",
        )
    }
}
