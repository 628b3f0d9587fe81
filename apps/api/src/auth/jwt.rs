// JWT token creation and verification
// Tokens are HS256-signed and expire one hour after issuance

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifetime of an issued token
pub const TOKEN_LIFETIME_HOURS: i64 = 1;

/// JWT claims structure
///
/// # Fields
/// * `user_id` - Database id of the authenticated user
/// * `username` - Username at the time the token was issued
/// * `exp` - Expiry time (seconds since epoch)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub user_id: i64,
    pub username: String,
    pub exp: usize,
}

/// Errors raised while issuing or checking a token
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("failed to sign token: {0}")]
    Encoding(String),
}

/// Creates a token for a user that expires after [`TOKEN_LIFETIME_HOURS`]
///
/// # Example
/// ```
/// use blog_api::auth::jwt::{create_token, verify_token};
///
/// let token = create_token(7, "alice", "your-secret-key").expect("valid token");
/// let claims = verify_token(&token, "your-secret-key").expect("valid token");
/// assert_eq!(claims.user_id, 7);
/// ```
pub fn create_token(user_id: i64, username: &str, secret: &str) -> Result<String, TokenError> {
    let expiry = Utc::now() + Duration::hours(TOKEN_LIFETIME_HOURS);
    create_token_with_expiry(user_id, username, secret, expiry)
}

/// Creates a token with an explicit expiry instant
pub fn create_token_with_expiry(
    user_id: i64,
    username: &str,
    secret: &str,
    expires_at: DateTime<Utc>,
) -> Result<String, TokenError> {
    let claims = Claims {
        user_id,
        username: username.to_string(),
        exp: expires_at.timestamp().max(0) as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| TokenError::Encoding(e.to_string()))
}

/// Verifies signature and expiry, returning the embedded claims
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(e.to_string()),
    })
}
