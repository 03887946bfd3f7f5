use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::callbacks::dto::CallbackPayload;

/// Stored callback request, returned verbatim in the capture response.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CallbackRequest {
    pub id: Uuid,
    pub phone: String,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub dial_code: Option<String>,
    pub location_coords: Option<String>,
    pub location_address: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub requested_at: OffsetDateTime,
}

impl CallbackRequest {
    pub async fn create(db: &PgPool, payload: &CallbackPayload) -> anyhow::Result<CallbackRequest> {
        let (coords, address) = match payload.location.as_ref() {
            Some(l) => (Some(l.coords.clone()), Some(l.address.clone())),
            None => (None, None),
        };
        let requested_at = payload.timestamp.unwrap_or_else(OffsetDateTime::now_utc);

        let record = sqlx::query_as::<_, CallbackRequest>(
            r#"
            INSERT INTO callback_requests
                (phone, country, country_code, dial_code, location_coords, location_address, requested_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, phone, country, country_code, dial_code,
                      location_coords, location_address, requested_at
            "#,
        )
        .bind(&payload.phone)
        .bind(&payload.country)
        .bind(&payload.country_code)
        .bind(&payload.dial_code)
        .bind(coords)
        .bind(address)
        .bind(requested_at)
        .fetch_one(db)
        .await?;
        Ok(record)
    }
}
