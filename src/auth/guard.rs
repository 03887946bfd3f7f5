use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::{
    auth::{handlers::SESSION_COOKIE, jwt::JwtKeys},
    state::AppState,
};

#[derive(Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

/// Pure decision over (session-validity, target path). Authenticated
/// sessions are bounced off the auth pages; anonymous ones off the
/// booking history. Everything else passes through.
pub fn decide(authenticated: bool, path: &str) -> GuardDecision {
    if authenticated && (path.starts_with("/sign-in") || path.starts_with("/sign-up")) {
        return GuardDecision::Redirect("/");
    }
    if !authenticated && path.starts_with("/booking-history") {
        return GuardDecision::Redirect("/sign-in");
    }
    GuardDecision::Allow
}

/// Navigation-level gate. A missing, expired, or forged cookie is simply
/// "no session", never an error.
pub async fn route_guard(
    State(state): State<AppState>,
    jar: CookieJar,
    req: Request,
    next: Next,
) -> Response {
    let authenticated = jar
        .get(SESSION_COOKIE)
        .map(|cookie| JwtKeys::from_ref(&state).verify(cookie.value()).is_valid())
        .unwrap_or(false);

    match decide(authenticated, req.uri().path()) {
        GuardDecision::Allow => next.run(req).await,
        GuardDecision::Redirect(to) => {
            debug!(path = %req.uri().path(), to, "route guard redirect");
            Redirect::temporary(to).into_response()
        }
    }
}
