use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub coords: String,
    #[serde(default)]
    pub address: String,
}

/// Callback-request capture payload. Only the phone is enforced; country
/// and geolocation fields arrive on a best-effort basis from the client's
/// lookup services.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackPayload {
    pub phone: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub dial_code: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub timestamp: Option<OffsetDateTime>,
}

lazy_static! {
    static ref DIGITS_RE: Regex = Regex::new(r"^\d+$").unwrap();
}

impl CallbackPayload {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.phone.is_empty() {
            return Err(ApiError::Validation("Phone number is required".into()));
        }
        if !DIGITS_RE.is_match(&self.phone) {
            return Err(ApiError::Validation(
                "Phone number must contain only digits".into(),
            ));
        }
        Ok(())
    }
}
