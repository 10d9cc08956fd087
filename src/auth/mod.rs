pub mod extractors;
pub mod guard;
pub mod middleware;
pub mod password;
pub mod token;

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::Config;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use guard::is_creator;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{issue_token, verify_token, Claims, TokenSettings};

lazy_static! {
    // Regex for username validation: alphanumeric, underscores, hyphens
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

/// Everything the credential paths need: the token signing settings plus the
/// bcrypt cost factor. Built from `Config` in `main` and shared as app data.
#[derive(Clone)]
pub struct AuthSettings {
    pub token: TokenSettings,
    pub bcrypt_cost: u32,
}

impl AuthSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            token: TokenSettings {
                secret: config.jwt_secret.clone(),
                ttl_hours: config.token_ttl_hours,
            },
            bcrypt_cost: config.bcrypt_cost,
        }
    }
}

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address.
    #[validate(email)]
    pub email: String,
    /// User's password. Must be at least 6 characters long.
    #[validate(length(min = 6))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name for the new account.
    /// Between 3 and 32 characters, alphanumeric, underscores, or hyphens.
    #[validate(
        length(min = 3, max = 32),
        regex(
            path = "USERNAME_REGEX",
            message = "Username must be alphanumeric, underscores, or hyphens"
        )
    )]
    pub username: String,
    /// Email address for the new account.
    #[validate(email)]
    pub email: String,
    /// Password for the new account. Must be at least 6 characters long.
    #[validate(length(min = 6))]
    pub password: String,
}

/// Response structure after a successful login: the signed token and the
/// moment it stops being valid.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
