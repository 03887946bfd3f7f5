use axum::{routing::post, Router};

use crate::state::AppState;

pub mod dto;
pub mod handlers;

pub fn router() -> Router<AppState> {
    Router::new().route("/send-trip-email", post(handlers::send_trip_email))
}
