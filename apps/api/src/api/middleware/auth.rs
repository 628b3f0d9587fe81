use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::api::errors::ApiError;
use crate::auth::jwt::{verify_token, Claims};
use crate::auth::AuthConfig;

/// Authenticated identity for protected routes
///
/// Usage:
/// ```rust,ignore
/// async fn protected_handler(user: AuthUser) -> Result<String, ApiError> {
///     Ok(format!("Hello {}", user.username))
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

impl AuthUser {
    /// Checks the `Authorization` header and returns the identity it carries
    ///
    /// Accepts `Bearer <token>` as well as a bare token.
    pub fn from_headers(headers: &HeaderMap, config: &AuthConfig) -> Result<Self, ApiError> {
        let header = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ApiError::unauthorized("Token is missing."))?;

        let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();

        let claims = verify_token(token, config.jwt_secret())?;
        Ok(claims.into())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AuthConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AuthConfig::from_ref(state);
        Self::from_headers(&parts.headers, &config)
    }
}
