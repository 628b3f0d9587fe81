use serde::{Deserialize, Serialize};

/// Maximum length of a post title, in characters
pub const TITLE_MAX_LEN: usize = 100;

/// Title of a post
///
/// # Invariants
/// - Must not be blank
/// - At most [`TITLE_MAX_LEN`] characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostTitle(String);

impl PostTitle {
    /// # Example
    /// ```
    /// use blog_api::domain::post::PostTitle;
    ///
    /// assert!(PostTitle::new("hi").is_ok());
    /// assert!(PostTitle::new("").is_err());
    /// ```
    pub fn new(title: impl Into<String>) -> Result<Self, String> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err("Title must not be empty".to_string());
        }
        if title.chars().count() > TITLE_MAX_LEN {
            return Err(format!("Title must be at most {} characters", TITLE_MAX_LEN));
        }
        Ok(PostTitle(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Body text of a post; any non-blank text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostContent(String);

impl PostContent {
    pub fn new(content: impl Into<String>) -> Result<Self, String> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err("Content must not be empty".to_string());
        }
        Ok(PostContent(content))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
