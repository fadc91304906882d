//! Validation and translation of raw confirmation JSON into an [`ImagePayload`].
//!
//! The handlers deliberately take the request body as an untyped string and hand
//! it here, so every malformed or schema-invalid body surfaces as a
//! [`ValidationError`] rather than an extractor rejection.

use serde_json::Value;
use thiserror::Error;

use crate::payload::ImagePayload;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Malformed json: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Missing or empty field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for field: {0}")]
    InvalidField(&'static str),
}

/// Stateless translator from raw JSON to a per-request payload.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonValidator;

impl JsonValidator {
    pub fn new() -> Self {
        Self
    }

    /// Translate a nino-confirmation body. Requires `sessionId` and a `nino`
    /// in national-insurance shape (spaces tolerated, case-insensitive).
    pub fn translate_nino_confirmation(
        &self,
        raw: &str,
    ) -> Result<ImagePayload, ValidationError> {
        let body: Value = serde_json::from_str(raw)?;
        let session_id = required_string(&body, "sessionId")?;
        let nino = normalise(&required_string(&body, "nino")?);
        if !is_valid_nino(&nino) {
            return Err(ValidationError::InvalidField("nino"));
        }

        let mut payload = ImagePayload::new(session_id);
        payload.nino = Some(nino);
        Ok(payload)
    }

    /// Translate a mobile-confirmation body. Requires `sessionId` and a
    /// `mobileNumber` (optional leading `+`, 10-15 digits, spaces tolerated).
    pub fn translate_mobile_confirmation(
        &self,
        raw: &str,
    ) -> Result<ImagePayload, ValidationError> {
        let body: Value = serde_json::from_str(raw)?;
        let session_id = required_string(&body, "sessionId")?;
        let mobile = normalise(&required_string(&body, "mobileNumber")?);
        if !is_valid_mobile(&mobile) {
            return Err(ValidationError::InvalidField("mobileNumber"));
        }

        let mut payload = ImagePayload::new(session_id);
        payload.mobile_number = Some(mobile);
        Ok(payload)
    }
}

fn required_string(body: &Value, field: &'static str) -> Result<String, ValidationError> {
    body.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(ValidationError::MissingField(field))
}

fn normalise(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Two prefix letters, six digits, one suffix letter A-D.
fn is_valid_nino(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 9
        && bytes[..2].iter().all(u8::is_ascii_uppercase)
        && bytes[2..8].iter().all(u8::is_ascii_digit)
        && matches!(bytes[8], b'A'..=b'D')
}

fn is_valid_mobile(value: &str) -> bool {
    let digits = value.strip_prefix('+').unwrap_or(value);
    (10..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}
