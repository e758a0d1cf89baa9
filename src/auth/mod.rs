pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::PublicUser;

// Re-export necessary items
pub use extractors::AuthenticatedUserId;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, verify_token_allow_expired, Claims};

lazy_static! {
    // Email validation: local part, "@", domain with at least one dot.
    static ref EMAIL_REGEX: regex::Regex = regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address for the new account.
    #[validate(regex(path = "EMAIL_REGEX", message = "Invalid email format"))]
    pub email: String,
    /// Password for the new account.
    /// Must be at least 6 characters long.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    /// Display name for the new account.
    pub name: String,
}

/// Payload for a user login request.
///
/// Login input is intentionally not format-validated: a malformed email is
/// treated like any unknown email and surfaces as `InvalidCredentials`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response after successful registration or login: the session token plus
/// the public projection of the user. The password hash is never included.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Payload for a token refresh request. The token may be expired; only its
/// signature and shape are checked.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub token: String,
}

/// Response to a successful token refresh.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub token: String,
}
