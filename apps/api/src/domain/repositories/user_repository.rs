use async_trait::async_trait;

use crate::domain::errors::RepositoryResult;
use crate::domain::user::{PersonName, Username};

/// Stored user record
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
}

/// Validated data for a user that does not exist yet
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub password_hash: String,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub avatar: Option<String>,
}

/// Public view of a user, with the number of posts they authored
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
    pub post_count: i64,
}

/// Repository trait for users
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user, returning its id
    ///
    /// Fails with `RepositoryError::Conflict` when the username is taken.
    async fn create(&self, user: NewUser) -> RepositoryResult<i64>;

    /// Find a user by ID
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>>;

    /// Find a user by exact username
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;

    /// Load the public profile of a user
    async fn find_profile(&self, id: i64) -> RepositoryResult<Option<UserProfile>>;

    /// Delete a user together with every post they authored
    async fn delete(&self, id: i64) -> RepositoryResult<()>;
}
