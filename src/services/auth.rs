//!
//! # Auth Service
//!
//! Registration, login, user lookups, and the token refresh path. All input
//! validation happens here, before any store access; routes only extract the
//! caller and serialize the outcome.

use sqlx::PgPool;
use validator::Validate;

use crate::auth::{
    generate_token, hash_password, verify_password, verify_token_allow_expired, AuthResponse,
    LoginRequest, RegisterRequest,
};
use crate::error::AuthError;
use crate::models::{PublicUser, User, UserDetails};

/// Registers a new user and signs them in.
///
/// Rejects malformed emails and short passwords before touching the store.
/// The email must be unused; a concurrent registration that wins the race on
/// the unique constraint surfaces as `AlreadyRegistered` as well. On success
/// the password is hashed, the row inserted, and a one-hour session token
/// issued for the new account.
pub async fn register_user(
    pool: &PgPool,
    secret: &str,
    input: &RegisterRequest,
) -> Result<AuthResponse, AuthError> {
    input.validate()?;

    let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM users WHERE email = $1")
        .bind(&input.email)
        .fetch_optional(pool)
        .await?;

    if existing.is_some() {
        return Err(AuthError::AlreadyRegistered);
    }

    let password_hash = hash_password(&input.password)?;

    let user = sqlx::query_as::<_, PublicUser>(
        "INSERT INTO users (email, password_hash, name) VALUES ($1, $2, $3) \
         RETURNING id, email, name",
    )
    .bind(&input.email)
    .bind(&password_hash)
    .bind(&input.name)
    .fetch_one(pool)
    .await?;

    let token = generate_token(user.id, secret)?;

    Ok(AuthResponse { token, user })
}

/// Authenticates a user by email and password.
///
/// An unknown email and a wrong password produce the same
/// `InvalidCredentials` error, so callers cannot tell which one occurred.
pub async fn login_user(
    pool: &PgPool,
    secret: &str,
    input: &LoginRequest,
) -> Result<AuthResponse, AuthError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, password_hash, name, created_at FROM users WHERE email = $1",
    )
    .bind(&input.email)
    .fetch_optional(pool)
    .await?;

    let user = match user {
        Some(user) => user,
        None => return Err(AuthError::InvalidCredentials),
    };

    if !verify_password(&input.password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials);
    }

    let token = generate_token(user.id, secret)?;

    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

/// Fetches the profile projection (including creation time) for a user id.
pub async fn get_user_by_id(pool: &PgPool, user_id: i32) -> Result<UserDetails, AuthError> {
    sqlx::query_as::<_, UserDetails>(
        "SELECT id, email, name, created_at FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AuthError::UserNotFound)
}

/// Fetches the public projection for the user id carried in a verified
/// token.
pub async fn get_user_from_token_payload(
    pool: &PgPool,
    user_id: i32,
) -> Result<PublicUser, AuthError> {
    sqlx::query_as::<_, PublicUser>("SELECT id, email, name FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AuthError::UserNotFound)
}

/// Exchanges an old token for a fresh one-hour token.
///
/// Only the signature and shape of the old token are checked; an expired
/// token is fine. The user's continued existence is not re-verified.
pub fn refresh_token(secret: &str, old_token: &str) -> Result<String, AuthError> {
    let claims = verify_token_allow_expired(old_token, secret)?;
    generate_token(claims.sub, secret)
}
