use serde::Deserialize;

use crate::error::ApiError;

/// Trip-inquiry form submission. Everything is optional at parse time so a
/// missing field yields the form-level message instead of a decode error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripInquiry {
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub pickup_city: Option<String>,
    pub duration: Option<String>,
    pub pickup_date: Option<String>,
    pub pickup_time: Option<String>,
}

impl TripInquiry {
    pub fn validate(&self) -> Result<(), ApiError> {
        let required = [
            &self.mobile,
            &self.pickup_city,
            &self.duration,
            &self.pickup_date,
            &self.pickup_time,
        ];
        if required
            .iter()
            .any(|field| field.as_deref().map_or(true, |v| v.trim().is_empty()))
        {
            return Err(ApiError::Validation("All fields are required".into()));
        }
        Ok(())
    }
}
