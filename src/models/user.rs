//! User model and related types

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Passwords that are rejected outright regardless of the other rules
static WEAK_PASSWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["Passw0rd", "Password123", "Azerty123", "Qwerty123"]
        .into_iter()
        .collect()
});

/// Full user record from the database
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Signup request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(function = validate_password_strength))]
    pub password: String,
}

/// Login request. Unlike signup, no shape checks are applied here; an
/// unknown email fails authentication instead.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: the authenticated user id and a bearer token
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub token: String,
}

/// Password policy: 8-25 characters, at least one uppercase and one
/// lowercase letter, at least two digits, no spaces, not blacklisted.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let fail = |message: &'static str| {
        let mut error = ValidationError::new("password_strength");
        error.message = Some(message.into());
        error
    };

    let length = password.chars().count();
    if !(8..=25).contains(&length) {
        return Err(fail("Password must be between 8 and 25 characters"));
    }
    if password.contains(' ') {
        return Err(fail("Password must not contain spaces"));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(fail("Password must contain an uppercase letter"));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(fail("Password must contain a lowercase letter"));
    }
    if password.chars().filter(|c| c.is_ascii_digit()).count() < 2 {
        return Err(fail("Password must contain at least two digits"));
    }
    if WEAK_PASSWORDS.contains(password) {
        return Err(fail("Password is too common"));
    }
    Ok(())
}

/// JWT claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Build claims for a user, expiring `expiration_hours` from now
    pub fn new(user_id: Uuid, expiration_hours: u64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            user_id,
            exp: now + (expiration_hours as i64 * 3600),
            iat: now,
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse and verify a JWT token (signature and expiry)
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}
