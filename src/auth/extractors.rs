use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use crate::auth::{cookie, jwt::JwtKeys};
use crate::error::ApiError;

/// Auth guard: resolves the session cookie into a verified user id, or
/// rejects with 401 before the handler body runs.
#[derive(Debug)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = cookie::extract_session_token(&parts.headers)
            .ok_or(ApiError::Unauthorized("Unauthorized - no token provided"))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(&token).map_err(|_| {
            warn!("invalid or expired session token");
            ApiError::Unauthorized("Unauthorized - invalid token")
        })?;

        Ok(AuthUser(claims.sub))
    }
}
