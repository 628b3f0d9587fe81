use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::auth::AuthConfig;
use crate::config::Config;
use crate::infrastructure::avatar_store::AvatarStore;

/// Shared handler state; handlers extract only the parts they need
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: SqlitePool,
    pub auth: AuthConfig,
    pub avatars: AvatarStore,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        Self {
            pool,
            auth: AuthConfig::new(config.jwt_secret.as_str(), config.bcrypt_cost),
            avatars: AvatarStore::new(config.upload_dir.clone()),
        }
    }
}
