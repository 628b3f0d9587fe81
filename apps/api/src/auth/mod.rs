// Authentication primitives: token signing and password hashing
// Kept free of HTTP concerns so the guard and handlers can share them

use std::sync::Arc;

pub mod jwt;
pub mod password;

/// Settings shared by everything that issues or checks credentials
#[derive(Debug, Clone)]
pub struct AuthConfig {
    jwt_secret: Arc<str>,
    bcrypt_cost: u32,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<Arc<str>>, bcrypt_cost: u32) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            bcrypt_cost,
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }
}
