use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod guard;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth", post(handlers::auth))
        .route("/auth/user", get(handlers::current_user))
        .route("/auth/logout", post(handlers::logout))
}
