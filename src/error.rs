//!
//! # Service Error Types
//!
//! Each service owns a closed error enum: `AuthError` for the auth service
//! and `TaskError` for the task service. Callers pattern-match on the kind;
//! the HTTP layer converts each variant into a JSON error response through
//! `actix_web::error::ResponseError`.
//!
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! and `bcrypt::BcryptError` allow conversion with the `?` operator at the
//! store and hashing seams.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Outcomes of the auth service that are surfaced to callers.
#[derive(Debug)]
pub enum AuthError {
    /// Malformed registration input: bad email format or short password (HTTP 422).
    Validation(String),
    /// The email is already taken, including losing a concurrent
    /// registration race on the unique constraint (HTTP 400).
    AlreadyRegistered,
    /// Unknown email or wrong password. Deliberately a single variant so the
    /// two cases are indistinguishable to the caller (HTTP 401).
    InvalidCredentials,
    /// No user row behind the requested id (HTTP 404).
    UserNotFound,
    /// A token failed signature or format checks on refresh (HTTP 401).
    InvalidToken,
    /// Hashing or token-minting failure (HTTP 500).
    Internal(String),
    /// Any other store failure (HTTP 500).
    Database(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AuthError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            AuthError::AlreadyRegistered => write!(f, "Email already registered"),
            AuthError::InvalidCredentials => write!(f, "Invalid credentials"),
            AuthError::UserNotFound => write!(f, "User not found"),
            AuthError::InvalidToken => write!(f, "Invalid token"),
            AuthError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AuthError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AuthError::Validation(msg) => HttpResponse::UnprocessableEntity().json(json!({
                "error": msg
            })),
            AuthError::AlreadyRegistered => HttpResponse::BadRequest().json(json!({
                "error": "Email already registered"
            })),
            AuthError::InvalidCredentials => HttpResponse::Unauthorized().json(json!({
                "error": "Invalid credentials"
            })),
            AuthError::UserNotFound => HttpResponse::NotFound().json(json!({
                "error": "User not found"
            })),
            AuthError::InvalidToken => HttpResponse::Unauthorized().json(json!({
                "error": "Invalid token"
            })),
            // Internal and store failures are both presented as opaque 500s.
            AuthError::Internal(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
            AuthError::Database(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
        }
    }
}

/// Converts `sqlx::Error` into `AuthError`.
///
/// A unique-constraint violation means a concurrent registration won the
/// race for the email and maps to `AlreadyRegistered`; `RowNotFound` maps to
/// `UserNotFound`; everything else is a generic store failure.
impl From<sqlx::Error> for AuthError {
    fn from(error: sqlx::Error) -> AuthError {
        match error {
            sqlx::Error::RowNotFound => AuthError::UserNotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::AlreadyRegistered,
            other => AuthError::Database(other.to_string()),
        }
    }
}

impl From<ValidationErrors> for AuthError {
    fn from(error: ValidationErrors) -> AuthError {
        AuthError::Validation(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for AuthError {
    fn from(error: bcrypt::BcryptError) -> AuthError {
        AuthError::Internal(error.to_string())
    }
}

/// Outcomes of the task service that are surfaced to callers.
#[derive(Debug)]
pub enum TaskError {
    /// Title missing, empty, or starting with a digit (HTTP 422).
    InvalidTitle,
    /// Other input rejections, currently a due date in the past (HTTP 422).
    Validation(String),
    /// No task with that id under that owner. Missing and not-owned are a
    /// single outcome by design (HTTP 404).
    NotFound,
    /// Any other store failure (HTTP 500).
    Database(String),
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskError::InvalidTitle => write!(f, "Invalid task title"),
            TaskError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            TaskError::NotFound => write!(f, "Task not found"),
            TaskError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl ResponseError for TaskError {
    fn error_response(&self) -> HttpResponse {
        match self {
            TaskError::InvalidTitle => HttpResponse::UnprocessableEntity().json(json!({
                "error": "Task title must be non-empty and must not start with a digit"
            })),
            TaskError::Validation(msg) => HttpResponse::UnprocessableEntity().json(json!({
                "error": msg
            })),
            TaskError::NotFound => HttpResponse::NotFound().json(json!({
                "error": "Task not found"
            })),
            TaskError::Database(msg) => HttpResponse::InternalServerError().json(json!({
                "error": msg
            })),
        }
    }
}

/// Converts `sqlx::Error` into `TaskError`.
///
/// `RowNotFound` becomes `NotFound`; other store errors become
/// `TaskError::Database`.
impl From<sqlx::Error> for TaskError {
    fn from(error: sqlx::Error) -> TaskError {
        match error {
            sqlx::Error::RowNotFound => TaskError::NotFound,
            other => TaskError::Database(other.to_string()),
        }
    }
}
