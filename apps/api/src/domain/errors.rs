use thiserror::Error;

/// Errors surfaced by repository implementations
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
