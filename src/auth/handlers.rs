use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::{
    cookie::{Cookie, CookieJar, SameSite},
    WithRejection,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthRequest, PublicUser, SigninData, SigninRequest, SignupRequest},
        jwt::{JwtKeys, TokenOutcome},
        password::PasswordHasher,
        repo::{NewUser, User},
    },
    error::{ApiError, ApiResponse},
    state::AppState,
};

pub const SESSION_COOKIE: &str = "token";

/// Session cookie issued at signin: http-only, SameSite=Strict, scoped to
/// the whole site, expiring with the token.
pub(crate) fn session_cookie(
    token: String,
    max_age: time::Duration,
    secure: bool,
) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_secure(secure);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_path("/");
    cookie.set_max_age(max_age);
    cookie
}

pub(crate) fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    session_cookie(String::new(), time::Duration::ZERO, secure)
}

#[instrument(skip(state, jar, payload))]
pub async fn auth(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(payload), _): WithRejection<Json<AuthRequest>, ApiError>,
) -> Result<Response, ApiError> {
    match payload {
        AuthRequest::Signup(req) => signup(&state, req).await,
        AuthRequest::Signin(req) => signin(&state, jar, req).await,
    }
}

async fn signup(state: &AppState, mut req: SignupRequest) -> Result<Response, ApiError> {
    req.email = req.email.trim().to_lowercase();
    req.validate()?;

    // Pre-check for a friendly conflict; the unique index still backstops
    // a concurrent duplicate inside User::create.
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        warn!(email = %req.email, "signup email already registered");
        return Err(ApiError::Conflict("User already exists"));
    }

    let hasher = PasswordHasher::from_ref(state);
    let password_hash = hasher.hash(&req.password)?;
    let role = req.role.unwrap_or_default();

    let user = User::create(
        &state.db,
        &NewUser {
            name: req.name.trim(),
            email: &req.email,
            password_hash: &password_hash,
            mobile: &req.mobile,
            role,
        },
    )
    .await?;

    info!(user_id = %user.id, email = %user.email, "user created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message_data(
            "User created successfully",
            PublicUser::from(user),
        )),
    )
        .into_response())
}

async fn signin(
    state: &AppState,
    jar: CookieJar,
    mut req: SigninRequest,
) -> Result<Response, ApiError> {
    req.email = req.email.trim().to_lowercase();
    req.validate()?;

    // Unknown email and wrong password collapse into the same failure.
    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %req.email, "signin unknown email");
            ApiError::InvalidCredentials
        })?;

    let hasher = PasswordHasher::from_ref(state);
    if !hasher.verify(&req.password, &user.password_hash) {
        warn!(user_id = %user.id, "signin invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    if req.role != user.role {
        warn!(user_id = %user.id, requested = %req.role, "signin role mismatch");
        return Err(ApiError::RoleMismatch {
            requested: req.role,
            actual: user.role,
        });
    }

    let keys = JwtKeys::from_ref(state);
    let token = keys.sign(&user)?;
    let max_age = time::Duration::minutes(state.config.jwt.ttl_minutes);
    let jar = jar.add(session_cookie(
        token.clone(),
        max_age,
        state.config.cookie_secure,
    ));

    info!(user_id = %user.id, "user signed in");
    Ok((
        jar,
        Json(ApiResponse::message_data(
            "Signed in successfully",
            SigninData {
                role: user.role,
                token,
            },
        )),
    )
        .into_response())
}

/// Reads the session cookie and re-fetches the record by id, so the client
/// always sees the stored role/name rather than stale token claims.
#[instrument(skip(state, jar))]
pub async fn current_user(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<ApiResponse<PublicUser>>, ApiError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_owned())
        .ok_or(ApiError::Unauthenticated("No token found, please login"))?;

    let keys = JwtKeys::from_ref(&state);
    let claims = match keys.verify(&token) {
        TokenOutcome::Valid(claims) => claims,
        TokenOutcome::Expired | TokenOutcome::Malformed => {
            return Err(ApiError::Unauthenticated("Invalid or expired token"))
        }
    };

    let user = User::find_by_id(&state.db, claims.id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    Ok(Json(ApiResponse::data(PublicUser::from(user))))
}

/// Overwrites the cookie unconditionally; succeeds whether or not a
/// session existed.
#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<ApiResponse<()>>) {
    let jar = jar.add(clear_session_cookie(state.config.cookie_secure));
    (jar, Json(ApiResponse::message("Logged out successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("abc.def.ghi".into(), time::Duration::hours(1), false);
        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "abc.def.ghi");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(1)));
        assert_ne!(cookie.secure(), Some(true));
    }

    #[test]
    fn session_cookie_honors_secure_flag() {
        let cookie = session_cookie("t".into(), time::Duration::hours(1), true);
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn clear_cookie_expires_immediately_and_is_idempotent() {
        let first = clear_session_cookie(false);
        let second = clear_session_cookie(false);
        for cookie in [first, second] {
            assert_eq!(cookie.name(), "token");
            assert_eq!(cookie.value(), "");
            assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
            assert_eq!(cookie.http_only(), Some(true));
        }
    }

    #[test]
    fn signin_data_serialization() {
        use crate::auth::dto::Role;
        let data = SigninData {
            role: Role::User,
            token: "jwt-goes-here".into(),
        };
        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("jwt-goes-here"));
    }

    #[tokio::test]
    async fn malformed_body_becomes_a_validation_error() {
        use axum::extract::FromRequest;

        let req = axum::http::Request::builder()
            .method("POST")
            .header(axum::http::header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(
                r#"{"action": "signup", "email": "alice@example.com"}"#,
            ))
            .unwrap();
        let rejection = Json::<AuthRequest>::from_request(req, &())
            .await
            .unwrap_err();
        let err = ApiError::from(rejection);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(!err.to_string().is_empty());
    }
}
