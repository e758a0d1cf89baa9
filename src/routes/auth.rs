use crate::{
    auth::{
        AuthenticatedUserId, LoginRequest, RefreshRequest, RefreshResponse, RegisterRequest,
    },
    config::Config,
    error::AuthError,
    services,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use sqlx::PgPool;

/// Register a new user
///
/// Creates a new user account and returns a session token together with the
/// public user projection.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AuthError> {
    let response = services::auth::register_user(&pool, &config.jwt_secret, &register_data).await?;

    Ok(HttpResponse::Created().json(response))
}

/// Login user
///
/// Authenticates a user and returns a session token together with the public
/// user projection.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AuthError> {
    let response = services::auth::login_user(&pool, &config.jwt_secret, &login_data).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// Refresh a session token
///
/// Accepts a possibly-expired token and returns a fresh one bound to the
/// same user, as long as the old token's signature checks out.
#[post("/refresh")]
pub async fn refresh(
    config: web::Data<Config>,
    refresh_data: web::Json<RefreshRequest>,
) -> Result<impl Responder, AuthError> {
    let token = services::auth::refresh_token(&config.jwt_secret, &refresh_data.token)?;

    Ok(HttpResponse::Ok().json(RefreshResponse { token }))
}

/// Returns the public projection of the authenticated user.
#[get("/me")]
pub async fn me(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AuthError> {
    let user = services::auth::get_user_from_token_payload(&pool, user_id.0).await?;

    Ok(HttpResponse::Ok().json(user))
}

/// Returns the profile projection (including creation time) of the
/// authenticated user.
#[get("/profile")]
pub async fn profile(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AuthError> {
    let user = services::auth::get_user_by_id(&pool, user_id.0).await?;

    Ok(HttpResponse::Ok().json(user))
}
