use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::repositories::post_repository::{
    NewPost, Post, PostChanges, PostRepository, PostWithAuthor,
};

/// SQLite implementation of PostRepository
pub struct SqlitePostRepository {
    pool: SqlitePool,
}

impl SqlitePostRepository {
    /// Creates a new SqlitePostRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const SELECT_WITH_AUTHOR: &str = r#"
    SELECT
        p.id, p.title, p.content, p.created_at, p.views, p.user_id,
        u.username AS author
    FROM posts p
    JOIN users u ON u.id = p.user_id
"#;

#[async_trait]
impl PostRepository for SqlitePostRepository {
    async fn create(&self, post: NewPost) -> RepositoryResult<Post> {
        let created = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, content, created_at, views, user_id)
            VALUES (?, ?, ?, 0, ?)
            RETURNING id, title, content, created_at, views, user_id
            "#,
        )
        .bind(post.title.as_str())
        .bind(post.content.as_str())
        .bind(Utc::now())
        .bind(post.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<PostWithAuthor>> {
        let posts = sqlx::query_as::<_, PostWithAuthor>(&format!(
            "{} ORDER BY p.id",
            SELECT_WITH_AUTHOR
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, created_at, views, user_id
            FROM posts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn record_view(&self, id: i64) -> RepositoryResult<Option<PostWithAuthor>> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE posts SET views = views + 1 WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let post = sqlx::query_as::<_, PostWithAuthor>(&format!(
            "{} WHERE p.id = ?",
            SELECT_WITH_AUTHOR
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(post)
    }

    async fn find_by_author(&self, user_id: i64) -> RepositoryResult<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, created_at, views, user_id
            FROM posts
            WHERE user_id = ?
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn update(&self, id: i64, changes: PostChanges) -> RepositoryResult<Post> {
        let title = changes.title.as_ref().map(|t| t.as_str());
        let content = changes.content.as_ref().map(|c| c.as_str());

        let updated = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = COALESCE(?, title),
                content = COALESCE(?, content)
            WHERE id = ?
            RETURNING id, title, content, created_at, views, user_id
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| RepositoryError::NotFound(format!("post {}", id)))
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("post {}", id)));
        }

        Ok(())
    }
}
