use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::user::UserId;

/// Signing secret and validity window for issued tokens. Constructed from
/// `Config` at startup and passed explicitly to the issuing and verifying
/// paths; nothing here reads the environment.
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub ttl_hours: i64,
}

/// Claims encoded within an issued JWT: the user's identity as the rest of
/// the API needs it, plus the standard timestamps.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// The user's identifier.
    pub sub: UserId,
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
}

/// A freshly signed token together with its expiry, so callers can report
/// the validity window they were given.
#[derive(Debug)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs a token for the given identity, valid for `settings.ttl_hours`.
pub fn issue_token(
    id: UserId,
    name: &str,
    email: &str,
    settings: &TokenSettings,
) -> Result<IssuedToken, AppError> {
    let now = Utc::now();
    let expires_at = now
        .checked_add_signed(Duration::hours(settings.ttl_hours))
        .ok_or_else(|| AppError::Internal("token expiry out of range".into()))?;

    let claims = Claims {
        sub: id,
        name: name.to_string(),
        email: email.to_string(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))?;

    Ok(IssuedToken { token, expires_at })
}

/// Verifies a JWT string and decodes its claims.
///
/// Default validation checks apply: signature and expiration. A malformed,
/// tampered, or expired token yields `AppError::Unauthorized`.
pub fn verify_token(token: &str, settings: &TokenSettings) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}
