use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::{auth::dto::Role, auth::repo::User, config::JwtConfig, state::AppState};

/// Identity claims carried by the session token. The token is the only
/// session state in the system; nothing is stored server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub role: Role,
    pub email: String,
    pub mobile: String,
    pub iat: usize,
    pub exp: usize,
}

/// Typed verification result so a caller cannot accidentally treat an
/// invalid token as authenticated. Expired and malformed are distinguished
/// for logging only; both mean "not authenticated" to a client.
#[derive(Debug)]
pub enum TokenOutcome {
    Valid(Claims),
    Expired,
    Malformed,
}

impl TokenOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenOutcome::Valid(_))
    }
}

#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn sign(&self, user: &User) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            id: user.id,
            role: user.role,
            email: user.email.clone(),
            mobile: user.mobile.clone(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user.id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> TokenOutcome {
        let validation = Validation::new(Algorithm::HS256);
        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => {
                debug!(user_id = %data.claims.id, "jwt verified");
                TokenOutcome::Valid(data.claims)
            }
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => {
                    debug!("jwt expired");
                    TokenOutcome::Expired
                }
                _ => {
                    debug!(error = %e, "jwt rejected");
                    TokenOutcome::Malformed
                }
            },
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            ttl_minutes,
        } = state.config.jwt.clone();
        Self::new(&secret, Duration::from_secs((ttl_minutes as u64) * 60))
    }
}
