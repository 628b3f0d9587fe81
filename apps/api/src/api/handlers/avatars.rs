use axum::{
    extract::{Path, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};

use crate::api::errors::ApiError;
use crate::infrastructure::avatar_store::AvatarStore;

/// Serve a stored avatar file
///
/// GET /avatars/:filename
pub async fn get_avatar(
    State(avatars): State<AvatarStore>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let avatar = avatars
        .load(&filename)
        .await?
        .ok_or_else(|| ApiError::not_found("Avatar not found."))?;

    Ok(([(CONTENT_TYPE, avatar.content_type)], avatar.bytes).into_response())
}
