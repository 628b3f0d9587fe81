use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a username, in characters
pub const USERNAME_MAX_LEN: usize = 50;

/// Maximum length of a first or last name, in characters
pub const NAME_MAX_LEN: usize = 50;

/// Username value object
///
/// # Invariants
/// - Must not be blank
/// - At most [`USERNAME_MAX_LEN`] characters
/// - Is immutable after construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Creates a new Username value object
    ///
    /// # Example
    /// ```
    /// use blog_api::domain::user::value_objects::Username;
    ///
    /// let username = Username::new("alice").expect("valid username");
    /// assert_eq!(username.as_str(), "alice");
    /// ```
    pub fn new(username: impl Into<String>) -> Result<Self, String> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err("Username must not be empty".to_string());
        }
        if username.chars().count() > USERNAME_MAX_LEN {
            return Err(format!(
                "Username must be at most {} characters",
                USERNAME_MAX_LEN
            ));
        }
        Ok(Username(username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// First or last name of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName(String);

impl PersonName {
    /// `field` names the input in the error message ("first_name", "last_name")
    pub fn new(name: impl Into<String>, field: &str) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(format!("{} must not be empty", field));
        }
        if name.chars().count() > NAME_MAX_LEN {
            return Err(format!(
                "{} must be at most {} characters",
                field, NAME_MAX_LEN
            ));
        }
        Ok(PersonName(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
