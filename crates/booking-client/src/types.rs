//! Request types for the booking API

use booking_wizard::{BookingForm, Locale};
use serde::Serialize;

/// Body of `POST /api/bookings`: the form fields plus the display language
#[derive(Debug, Clone, Serialize)]
pub struct BookingRequest<'a> {
    #[serde(flatten)]
    pub form: &'a BookingForm,
    pub lang: &'static str,
}

impl<'a> BookingRequest<'a> {
    pub fn new(form: &'a BookingForm, locale: Locale) -> Self {
        Self {
            form,
            lang: locale.code(),
        }
    }
}
