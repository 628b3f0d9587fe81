// Password hashing utilities
// Uses bcrypt so stored credentials are salted hashes, never clear text

use bcrypt::{hash, verify};

pub use bcrypt::DEFAULT_COST;

/// Lowest cost bcrypt accepts
pub const MIN_COST: u32 = 4;
/// Highest cost bcrypt accepts
pub const MAX_COST: u32 = 31;

/// Hashes a password using bcrypt with the given cost
///
/// # Example
/// ```
/// use blog_api::auth::password::hash_password;
///
/// let hash = hash_password("my_password", 4).expect("valid hash");
/// assert_ne!(hash, "my_password");
/// ```
pub fn hash_password(password: &str, cost: u32) -> Result<String, String> {
    hash(password, cost).map_err(|e| e.to_string())
}

/// Verifies a password against a bcrypt hash
///
/// # Returns
/// * `Ok(bool)` - True if password matches, false otherwise
/// * `Err(String)` - If the stored hash is malformed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    verify(password, hash).map_err(|e| e.to_string())
}

/// Runs [`hash_password`] on the blocking pool so request workers stay free
pub async fn hash_password_blocking(password: String, cost: u32) -> Result<String, String> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| e.to_string())?
}

/// Runs [`verify_password`] on the blocking pool
pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, String> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| e.to_string())?
}
