use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{auth::repo::User, error::ApiError};

/// Access tier attached to a user record and asserted at signin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "role", rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Admin => f.write_str("admin"),
        }
    }
}

/// Auth request body, dispatched on the `action` tag.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum AuthRequest {
    Signup(SignupRequest),
    Signin(SigninRequest),
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub mobile: String,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref MOBILE_RE: Regex = Regex::new(r"^\d{10}$").unwrap();
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

impl SignupRequest {
    /// Field-level shape checks; messages are collected so the client sees
    /// every problem at once.
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut problems = Vec::new();
        if self.name.trim().chars().count() < 3 {
            problems.push("Name must be at least 3 characters");
        }
        if !is_valid_email(&self.email) {
            problems.push("Invalid email address");
        }
        if self.password.chars().count() < 6 {
            problems.push("Password must be at least 6 characters");
        }
        if !MOBILE_RE.is_match(&self.mobile) {
            problems.push("Mobile number must be 10 digits");
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(problems.join(", ")))
        }
    }
}

impl SigninRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut problems = Vec::new();
        if !is_valid_email(&self.email) {
            problems.push("Invalid email address");
        }
        if self.password.chars().count() < 6 {
            problems.push("Password must be at least 6 characters");
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(problems.join(", ")))
        }
    }
}

/// The only user shape ever serialized to a client. There is deliberately
/// no field for the password hash.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub role: Role,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            mobile: user.mobile,
            role: user.role,
        }
    }
}

/// Signin response payload; the token is echoed in the body for clients
/// that manage their own Authorization header.
#[derive(Debug, Serialize)]
pub struct SigninData {
    pub role: Role,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup_body() -> SignupRequest {
        SignupRequest {
            name: "Alice Doe".into(),
            email: "alice@example.com".into(),
            password: "secret1".into(),
            mobile: "9876543210".into(),
            role: None,
        }
    }

    #[test]
    fn parses_tagged_signup_action() {
        let json = r#"{
            "action": "signup",
            "name": "Alice Doe",
            "email": "alice@example.com",
            "password": "secret1",
            "mobile": "9876543210"
        }"#;
        match serde_json::from_str::<AuthRequest>(json).unwrap() {
            AuthRequest::Signup(req) => {
                assert_eq!(req.name, "Alice Doe");
                assert_eq!(req.role, None);
            }
            other => panic!("expected signup, got {:?}", other),
        }
    }

    #[test]
    fn parses_tagged_signin_action_with_role() {
        let json = r#"{
            "action": "signin",
            "email": "alice@example.com",
            "password": "secret1",
            "role": "admin"
        }"#;
        match serde_json::from_str::<AuthRequest>(json).unwrap() {
            AuthRequest::Signin(req) => assert_eq!(req.role, Role::Admin),
            other => panic!("expected signin, got {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_action() {
        let json = r#"{"action": "reset-password", "email": "a@b.co"}"#;
        assert!(serde_json::from_str::<AuthRequest>(json).is_err());
    }

    #[test]
    fn signin_requires_role() {
        let json = r#"{"action": "signin", "email": "a@b.co", "password": "secret1"}"#;
        assert!(serde_json::from_str::<AuthRequest>(json).is_err());
    }

    #[test]
    fn signup_validation_accepts_well_formed_payload() {
        assert!(signup_body().validate().is_ok());
    }

    #[test]
    fn signup_validation_reports_each_field() {
        let req = SignupRequest {
            name: "Al".into(),
            email: "not-an-email".into(),
            password: "short".into(),
            mobile: "12345".into(),
            role: None,
        };
        let err = req.validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Name must be at least 3 characters"));
        assert!(msg.contains("Invalid email address"));
        assert!(msg.contains("Password must be at least 6 characters"));
        assert!(msg.contains("Mobile number must be 10 digits"));
    }

    #[test]
    fn mobile_must_be_exactly_ten_digits() {
        let mut req = signup_body();
        req.mobile = "98765432101".into();
        assert!(req.validate().is_err());
        req.mobile = "98765abc10".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn role_round_trips_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::from_str::<Role>("\"user\"").unwrap(), Role::User);
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn public_user_never_contains_a_password_field() {
        let public = PublicUser {
            id: Uuid::new_v4(),
            name: "Alice Doe".into(),
            email: "alice@example.com".into(),
            mobile: "9876543210".into(),
            role: Role::User,
        };
        let json = serde_json::to_string(&public).unwrap();
        assert!(json.contains("alice@example.com"));
        assert!(!json.to_lowercase().contains("password"));
        assert!(!json.to_lowercase().contains("hash"));
    }
}
