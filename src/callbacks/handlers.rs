use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::WithRejection;
use tracing::{info, instrument};

use crate::{
    callbacks::{dto::CallbackPayload, repo::CallbackRequest},
    error::{ApiError, ApiResponse},
    mailer::notification_html,
    state::AppState,
};

const SUBJECT: &str = "New Callback Request";

#[instrument(skip(state, payload))]
pub async fn request_callback(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CallbackPayload>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let record = CallbackRequest::create(&state.db, &payload).await?;

    let phone = match &record.dial_code {
        Some(dial) => format!("{} {}", dial, record.phone),
        None => record.phone.clone(),
    };
    let html = notification_html(
        SUBJECT,
        &[
            ("Phone", phone),
            (
                "Country",
                record.country.clone().unwrap_or_else(|| "N/A".into()),
            ),
            (
                "Location",
                record
                    .location_address
                    .clone()
                    .filter(|a| !a.is_empty())
                    .unwrap_or_else(|| "N/A".into()),
            ),
            (
                "Coordinates",
                record
                    .location_coords
                    .clone()
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| "N/A".into()),
            ),
            ("Timestamp", record.requested_at.to_string()),
        ],
    );
    state.mailer.send(SUBJECT, html).await?;

    info!(id = %record.id, "callback request captured");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message_data(
            "Callback request submitted successfully",
            record,
        )),
    ))
}
