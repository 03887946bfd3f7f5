use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use tracing::{info, instrument};

use crate::{
    error::{ApiError, ApiResponse},
    mailer::notification_html,
    state::AppState,
    trips::dto::TripInquiry,
};

const SUBJECT: &str = "New Local Trip Request";

/// Formats the inquiry into the business notification email. Nothing is
/// persisted; the inquiry lives on only in the recipient's inbox.
#[instrument(skip(state, payload))]
pub async fn send_trip_email(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<TripInquiry>, ApiError>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    payload.validate()?;

    let field = |v: &Option<String>| v.clone().unwrap_or_default();
    let html = notification_html(
        SUBJECT,
        &[
            ("Mobile", field(&payload.mobile)),
            (
                "Email",
                payload.email.clone().unwrap_or_else(|| "N/A".into()),
            ),
            ("Pickup City", field(&payload.pickup_city)),
            ("Duration", field(&payload.duration)),
            ("Pickup Date", field(&payload.pickup_date)),
            ("Pickup Time", field(&payload.pickup_time)),
        ],
    );
    state.mailer.send(SUBJECT, html).await?;

    info!("trip inquiry forwarded");
    Ok(Json(ApiResponse::message("Email sent successfully")))
}

#[cfg(test)]
mod tests {
    use std::marker::PhantomData;
    use std::sync::Arc;

    use super::*;
    use crate::mailer::RecordingMailer;

    fn inquiry(json: &str) -> WithRejection<Json<TripInquiry>, ApiError> {
        WithRejection(Json(serde_json::from_str(json).unwrap()), PhantomData)
    }

    #[tokio::test]
    async fn inquiry_is_mailed_to_the_business() {
        let mailer = Arc::new(RecordingMailer::default());
        let state = AppState::fake_with(AppState::lazy_test_pool(), mailer.clone());

        let Json(resp) = send_trip_email(
            State(state),
            inquiry(
                r#"{
                    "mobile": "9876543210",
                    "pickupCity": "Bhubaneswar",
                    "duration": "8hrs / 80kms",
                    "pickupDate": "2026-09-01",
                    "pickupTime": "09:30"
                }"#,
            ),
        )
        .await
        .expect("send should succeed");
        assert!(resp.success);
        assert_eq!(resp.message.as_deref(), Some("Email sent successfully"));

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "New Local Trip Request");
        assert!(sent[0].1.contains("Bhubaneswar"));
        assert!(sent[0].1.contains("N/A")); // email omitted
    }

    #[tokio::test]
    async fn incomplete_inquiry_sends_nothing() {
        let mailer = Arc::new(RecordingMailer::default());
        let state = AppState::fake_with(AppState::lazy_test_pool(), mailer.clone());

        let err = send_trip_email(
            State(state),
            inquiry(r#"{"mobile": "9876543210"}"#),
        )
        .await
        .map(|_| ())
        .unwrap_err();
        assert_eq!(err.to_string(), "All fields are required");
        assert!(mailer.sent.lock().unwrap().is_empty());
    }
}
