use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::api::errors::ApiError;
use crate::api::handlers::{parse_id, MessageResponse};
use crate::api::middleware::AuthUser;
use crate::domain::repositories::user_repository::{UserProfile, UserRepository};
use crate::infrastructure::avatar_store::AvatarStore;
use crate::infrastructure::repositories::SqliteUserRepository;

const USER_NOT_FOUND: &str = "User not found.";

/// Public profile of an author
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
    pub all_posts: i64,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            username: profile.username,
            first_name: profile.first_name,
            last_name: profile.last_name,
            avatar: profile.avatar,
            all_posts: profile.post_count,
        }
    }
}

/// Delete the caller's own account and every post they wrote
///
/// DELETE /users/:username
pub async fn delete_user(
    State(pool): State<SqlitePool>,
    State(avatars): State<AvatarStore>,
    Path(username): Path<String>,
    caller: AuthUser,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_repo = SqliteUserRepository::new(pool);
    let user = user_repo
        .find_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;

    if user.id != caller.user_id {
        tracing::warn!(
            caller = caller.user_id,
            target = user.id,
            "Refused to delete another user's account"
        );
        return Err(ApiError::forbidden("You can only delete your own account."));
    }

    user_repo.delete(user.id).await?;

    if let Some(avatar) = user.avatar.as_deref() {
        avatars.remove(avatar).await;
    }

    tracing::info!(user_id = user.id, "User deleted");
    Ok(MessageResponse::new("User deleted successfully."))
}

/// Get an author's public profile
///
/// GET /author/:id
pub async fn get_profile(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let id = parse_id(&id, USER_NOT_FOUND)?;

    let user_repo = SqliteUserRepository::new(pool);
    let profile = user_repo
        .find_profile(id)
        .await?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;

    Ok(Json(ProfileResponse::from(profile)))
}
