//! Caller identity.
//!
//! Sign-in and sessions are handled by the identity gateway in front of this
//! service, which forwards the authenticated user's id in [`USER_ID_HEADER`].

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Extracts the authenticated user id; rejects the request with 401 otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

impl AuthenticatedUser {
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user = req
            .headers()
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| AuthenticatedUser(id.to_string()));

        ready(user.ok_or(AppError::Unauthorized))
    }
}
