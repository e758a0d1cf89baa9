use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AuthError;

/// Extracts the authenticated user's ID from request extensions.
///
/// Intended for routes protected by `AuthMiddleware`, which validates the
/// bearer token and inserts the user's id into request extensions. If the id
/// is missing (the middleware did not run), the extractor fails with a 401.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUserId(pub i32);

impl FromRequest for AuthenticatedUserId {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<i32>().copied() {
            Some(user_id) => ready(Ok(AuthenticatedUserId(user_id))),
            None => ready(Err(AuthError::InvalidToken.into())),
        }
    }
}
