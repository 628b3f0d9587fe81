// HTTP handlers grouped by resource

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Serialize;

use crate::api::errors::ApiError;

pub mod auth;
pub mod avatars;
pub mod posts;
pub mod users;

/// Body of responses that only acknowledge an action
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Json<Self> {
        Json(Self { message })
    }
}

/// Unwraps a JSON body, turning any rejection into a 400 with `message`
pub(crate) fn json_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    message: &str,
) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected JSON body");
        ApiError::bad_request(message)
    })
}

/// Parses a numeric path segment; anything else is reported as `not_found`
pub(crate) fn parse_id(raw: &str, not_found: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::not_found(not_found))
}

/// Returns the value when present and not blank
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
