//! Identity of the user behind a request.

use super::ApiError;
use crate::project::domain::UserId;
use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// Header carrying the authenticated user id, set by the session proxy.
pub const ACTOR_HEADER: &str = "x-gorex-user";

/// Authenticated user extracted from [`ACTOR_HEADER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor(pub UserId);

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ACTOR_HEADER)
            .ok_or_else(|| ApiError::unauthenticated("authentication required"))?;
        let text = raw
            .to_str()
            .map_err(|_| ApiError::unauthenticated("malformed user header"))?;
        let uuid = Uuid::parse_str(text.trim())
            .map_err(|_| ApiError::unauthenticated("malformed user header"))?;
        Ok(Self(UserId::from_uuid(uuid)))
    }
}
