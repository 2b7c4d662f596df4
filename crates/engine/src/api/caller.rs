//! Caller identity extracted from the `x-user-id` header.
//!
//! The header is set by the session service in front of the engine. A missing
//! or blank header means an anonymous caller.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use lastplanner_domain::UserId;
use lastplanner_shared::USER_ID_HEADER;

use super::http::ApiError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller(pub Option<UserId>);

impl Caller {
    pub fn user_id(&self) -> Option<&UserId> {
        self.0.as_ref()
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(USER_ID_HEADER) else {
            return Ok(Self(None));
        };

        let raw = value
            .to_str()
            .map_err(|_| ApiError::BadRequest(format!("{USER_ID_HEADER} header is not valid text")))?;
        if raw.trim().is_empty() {
            return Ok(Self(None));
        }

        UserId::new(raw)
            .map(|id| Self(Some(id)))
            .map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}
