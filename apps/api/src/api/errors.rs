use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::auth::jwt::TokenError;
use crate::domain::errors::RepositoryError;
use crate::infrastructure::avatar_store::AvatarStoreError;

const INTERNAL_MESSAGE: &str = "Internal server error.";

/// API error type with HTTP status code and message
///
/// Rendered as `{"error": message}`.
#[derive(Debug, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 401 Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Creates a 403 Forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 409 Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Creates a 500 Internal Server Error, logging the detail and hiding it
    /// from the client
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "Request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(message) => Self::conflict(message),
            RepositoryError::NotFound(message) => Self::not_found(message),
            RepositoryError::Database(e) => Self::internal(e),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => Self::unauthorized("Token has expired."),
            TokenError::Invalid(_) => Self::unauthorized("Invalid token."),
            TokenError::Encoding(e) => Self::internal(format!("Failed to create token: {}", e)),
        }
    }
}

impl From<AvatarStoreError> for ApiError {
    fn from(err: AvatarStoreError) -> Self {
        match err {
            AvatarStoreError::Write { .. } | AvatarStoreError::Directory { .. } => {
                tracing::error!(error = %err, "Avatar write failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store avatar.")
            }
            AvatarStoreError::Read { .. } => Self::internal(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_errors_map_to_statuses() {
        let conflict = ApiError::from(RepositoryError::Conflict("taken".into()));
        assert_eq!(conflict.status, StatusCode::CONFLICT);

        let missing = ApiError::from(RepositoryError::NotFound("post 1".into()));
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        let db = ApiError::from(RepositoryError::Database(sqlx::Error::RowNotFound));
        assert_eq!(db.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(db.message, INTERNAL_MESSAGE);
    }

    #[test]
    fn token_errors_are_unauthorized() {
        assert_eq!(
            ApiError::from(TokenError::Expired),
            ApiError::unauthorized("Token has expired.")
        );
        assert_eq!(
            ApiError::from(TokenError::Invalid("bad".into())),
            ApiError::unauthorized("Invalid token.")
        );
    }

    #[tokio::test]
    async fn renders_json_error_body() {
        let response = ApiError::not_found("Post not found.").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({"error": "Post not found."}));
    }
}
