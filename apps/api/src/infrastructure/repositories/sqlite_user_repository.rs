use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::repositories::user_repository::{NewUser, User, UserProfile, UserRepository};

/// SQLite implementation of UserRepository
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Creates a new SqliteUserRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: NewUser) -> RepositoryResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, first_name, last_name, avatar)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.username.as_str())
        .bind(&user.password_hash)
        .bind(user.first_name.as_str())
        .bind(user.last_name.as_str())
        .bind(&user.avatar)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                RepositoryError::Conflict(format!("username {} already exists", user.username))
            }
            other => RepositoryError::Database(other),
        })?;

        Ok(result.last_insert_rowid())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, first_name, last_name, avatar
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, first_name, last_name, avatar
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_profile(&self, id: i64) -> RepositoryResult<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT
                u.id, u.username, u.first_name, u.last_name, u.avatar,
                (SELECT COUNT(*) FROM posts p WHERE p.user_id = u.id) AS post_count
            FROM users u
            WHERE u.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM posts WHERE user_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("user {}", id)));
        }

        tx.commit().await?;
        Ok(())
    }
}
