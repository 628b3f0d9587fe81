use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::api::errors::ApiError;
use crate::api::handlers::{json_body, non_blank, parse_id, MessageResponse};
use crate::api::middleware::AuthUser;
use crate::domain::post::{PostContent, PostTitle};
use crate::domain::repositories::post_repository::{
    NewPost, Post, PostChanges, PostRepository, PostWithAuthor,
};
use crate::domain::repositories::user_repository::UserRepository;
use crate::infrastructure::repositories::{SqlitePostRepository, SqliteUserRepository};

const POST_NOT_FOUND: &str = "Post not found.";
const USER_NOT_FOUND: &str = "User not found.";
const POST_FIELDS_REQUIRED: &str = "Title and content are required.";

/// Request body for creating a post
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Request body for updating a post; absent fields are left alone
#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// A post as listed publicly; `user_id` carries the author's username
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
    pub views: i64,
}

impl From<PostWithAuthor> for PostResponse {
    fn from(row: PostWithAuthor) -> Self {
        Self {
            id: row.post.id,
            title: row.post.title,
            content: row.post.content,
            created_at: row.post.created_at,
            user_id: row.author,
            views: row.post.views,
        }
    }
}

/// Response from post creation
#[derive(Debug, Serialize)]
pub struct CreatePostResponse {
    pub message: &'static str,
    pub post_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user_id: i64,
    pub views: i64,
}

impl From<Post> for CreatePostResponse {
    fn from(post: Post) -> Self {
        Self {
            message: "Post created successfully.",
            post_id: post.id,
            title: post.title,
            content: post.content,
            created_at: post.created_at,
            user_id: post.user_id,
            views: post.views,
        }
    }
}

/// A post inside an author listing
#[derive(Debug, Serialize)]
pub struct AuthorPost {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub views: i64,
}

/// All posts of an author with their summed views
#[derive(Debug, Serialize)]
pub struct AuthorPostsResponse {
    pub all_views: i64,
    pub posts: Vec<AuthorPost>,
}

impl From<Vec<Post>> for AuthorPostsResponse {
    fn from(posts: Vec<Post>) -> Self {
        let all_views = posts.iter().map(|p| p.views).sum();
        let posts = posts
            .into_iter()
            .map(|p| AuthorPost {
                id: p.id,
                title: p.title,
                content: p.content,
                created_at: p.created_at,
                views: p.views,
            })
            .collect();

        Self { all_views, posts }
    }
}

/// List every post with its author's username
///
/// GET /posts
pub async fn list_posts(
    State(pool): State<SqlitePool>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let post_repo = SqlitePostRepository::new(pool);
    let posts = post_repo.find_all().await?;

    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// Read a post, counting the view
///
/// GET /posts/:id
pub async fn get_post(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<PostResponse>, ApiError> {
    let id = parse_id(&id, POST_NOT_FOUND)?;

    let post_repo = SqlitePostRepository::new(pool);
    let post = post_repo
        .record_view(id)
        .await?
        .ok_or_else(|| ApiError::not_found(POST_NOT_FOUND))?;

    Ok(Json(PostResponse::from(post)))
}

/// Create a post authored by the caller
///
/// POST /posts
pub async fn create_post(
    State(pool): State<SqlitePool>,
    caller: AuthUser,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatePostResponse>), ApiError> {
    let req = json_body(payload, POST_FIELDS_REQUIRED)?;
    let (Some(title), Some(content)) = (non_blank(req.title), non_blank(req.content)) else {
        return Err(ApiError::bad_request(POST_FIELDS_REQUIRED));
    };
    let title = PostTitle::new(title).map_err(ApiError::bad_request)?;
    let content = PostContent::new(content).map_err(ApiError::bad_request)?;

    let user_repo = SqliteUserRepository::new(pool.clone());
    if user_repo.find_by_id(caller.user_id).await?.is_none() {
        return Err(ApiError::not_found(USER_NOT_FOUND));
    }

    let post_repo = SqlitePostRepository::new(pool);
    let post = post_repo
        .create(NewPost {
            title,
            content,
            user_id: caller.user_id,
        })
        .await?;

    tracing::info!(post_id = post.id, user_id = caller.user_id, "Post created");
    Ok((StatusCode::CREATED, Json(CreatePostResponse::from(post))))
}

/// Edit the title and/or content of the caller's own post
///
/// PUT /posts/:id
pub async fn update_post(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
    caller: AuthUser,
    payload: Result<Json<UpdatePostRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, POST_NOT_FOUND)?;

    let post_repo = SqlitePostRepository::new(pool);
    let post = post_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(POST_NOT_FOUND))?;

    if post.user_id != caller.user_id {
        tracing::warn!(post_id = id, caller = caller.user_id, "Refused to edit another user's post");
        return Err(ApiError::forbidden("You can only edit your own posts."));
    }

    let req = json_body(payload, "Invalid request body.")?;
    let changes = PostChanges {
        title: req
            .title
            .map(PostTitle::new)
            .transpose()
            .map_err(ApiError::bad_request)?,
        content: req
            .content
            .map(PostContent::new)
            .transpose()
            .map_err(ApiError::bad_request)?,
    };

    if !changes.is_empty() {
        post_repo.update(id, changes).await?;
    }

    Ok(MessageResponse::new("Post updated successfully."))
}

/// Delete the caller's own post
///
/// DELETE /posts/:id
pub async fn delete_post(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
    caller: AuthUser,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id, POST_NOT_FOUND)?;

    let post_repo = SqlitePostRepository::new(pool);
    let post = post_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(POST_NOT_FOUND))?;

    if post.user_id != caller.user_id {
        tracing::warn!(post_id = id, caller = caller.user_id, "Refused to delete another user's post");
        return Err(ApiError::forbidden("You can only delete your own posts."));
    }

    post_repo.delete(id).await?;

    tracing::info!(post_id = id, user_id = caller.user_id, "Post deleted");
    Ok(MessageResponse::new("Post deleted successfully."))
}

/// List an author's posts with their total views
///
/// GET /author/:id/posts
pub async fn list_author_posts(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<AuthorPostsResponse>, ApiError> {
    let id = parse_id(&id, USER_NOT_FOUND)?;

    let user_repo = SqliteUserRepository::new(pool.clone());
    if user_repo.find_by_id(id).await?.is_none() {
        return Err(ApiError::not_found(USER_NOT_FOUND));
    }

    let post_repo = SqlitePostRepository::new(pool);
    let posts = post_repo.find_by_author(id).await?;

    Ok(Json(AuthorPostsResponse::from(posts)))
}
