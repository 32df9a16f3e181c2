//! Booking Client - HTTP client for the travel booking API
//!
//! Used by the booking session to:
//! - Submit completed hotel and taxi bookings
//! - Report the backend's reason when a booking is refused

use async_trait::async_trait;
use booking_wizard::{BookingForm, BookingReceipt, BookingSubmitter, Locale, SubmissionError};
use reqwest::{header, Client, StatusCode};
use tracing::{debug, info, warn};

pub mod types;
pub use types::*;

/// Base URL used when nothing else is configured
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// Error types for booking client operations
#[derive(Debug, thiserror::Error)]
pub enum BookingClientError {
    #[error("Booking service not reachable at {0}")]
    NotReachable(String),
    #[error("{0}")]
    Api(String),
    #[error("Failed to parse booking response: {0}")]
    Parse(String),
}

impl From<BookingClientError> for SubmissionError {
    fn from(err: BookingClientError) -> Self {
        match err {
            // Leave the reason blank so the wizard shows its localized network message.
            BookingClientError::NotReachable(_) => SubmissionError::new(""),
            other => SubmissionError::new(other.to_string()),
        }
    }
}

/// Client for the booking API
#[derive(Clone)]
pub struct BookingApiClient {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl BookingApiClient {
    /// Create a new client with the given base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            token: None,
            client: Client::new(),
        }
    }

    /// Send `Authorization: Bearer <token>` with every request
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let url = self.url(path);
        debug!("Request: POST {}", url);
        let request = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Submit a completed booking
    pub async fn create_booking(
        &self,
        form: &BookingForm,
        locale: Locale,
    ) -> Result<BookingReceipt, BookingClientError> {
        let body = BookingRequest::new(form, locale);
        let resp = self
            .post("/api/bookings")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("Booking request failed to send: {}", e);
                BookingClientError::NotReachable(self.base_url.clone())
            })?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| BookingClientError::Parse(e.to_string()))?;

        if !status.is_success() {
            return Err(BookingClientError::Api(error_message(status, &text)));
        }

        if text.trim().is_empty() {
            return Ok(BookingReceipt::default());
        }
        let receipt: BookingReceipt =
            serde_json::from_str(&text).map_err(|e| BookingClientError::Parse(e.to_string()))?;
        info!(
            "Booking accepted (link: {}, qr: {})",
            receipt.continuation_link().is_some(),
            receipt.qr_url.is_some()
        );
        Ok(receipt)
    }
}

#[async_trait]
impl BookingSubmitter for BookingApiClient {
    async fn submit(
        &self,
        form: &BookingForm,
        locale: Locale,
    ) -> Result<BookingReceipt, SubmissionError> {
        self.create_booking(form, locale).await.map_err(Into::into)
    }
}

/// Human-readable reason from an error response: the `error` field, then
/// `message`, then a plain-text body, then the status code
pub fn error_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    let fallback = || format!("Request failed ({})", status.as_u16());
    if body.is_empty() {
        return fallback();
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => ["error", "message"]
            .iter()
            .filter_map(|field| value.get(*field).and_then(|v| v.as_str()))
            .map(str::trim)
            .find(|msg| !msg.is_empty())
            .map(str::to_string)
            .unwrap_or_else(fallback),
        Err(_) => body.to_string(),
    }
}
