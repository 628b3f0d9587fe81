use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::errors::RepositoryResult;
use crate::domain::post::{PostContent, PostTitle};

/// Stored post record
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub views: i64,
    pub user_id: i64,
}

/// Post joined with its author's username
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PostWithAuthor {
    #[sqlx(flatten)]
    pub post: Post,
    pub author: String,
}

/// Validated data for a new post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: PostTitle,
    pub content: PostContent,
    pub user_id: i64,
}

/// Partial update of a post; `None` leaves the field unchanged
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<PostTitle>,
    pub content: Option<PostContent>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

/// Repository trait for posts
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post with zero views
    async fn create(&self, post: NewPost) -> RepositoryResult<Post>;

    /// All posts with their author, oldest first
    async fn find_all(&self) -> RepositoryResult<Vec<PostWithAuthor>>;

    /// Find a post by ID without touching its view counter
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Post>>;

    /// Atomically increment the view counter and return the updated post
    async fn record_view(&self, id: i64) -> RepositoryResult<Option<PostWithAuthor>>;

    /// All posts written by a user, oldest first
    async fn find_by_author(&self, user_id: i64) -> RepositoryResult<Vec<Post>>;

    /// Apply a partial update, returning the updated post
    async fn update(&self, id: i64, changes: PostChanges) -> RepositoryResult<Post>;

    /// Delete a post by ID
    async fn delete(&self, id: i64) -> RepositoryResult<()>;
}
