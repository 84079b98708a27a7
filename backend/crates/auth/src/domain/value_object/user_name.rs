//! User Name Value Object
//!
//! Unique, immutable login identifier. Normalized to lowercase so
//! lookups and uniqueness are case-insensitive.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const USER_NAME_MIN_LENGTH: usize = 3;
pub const USER_NAME_MAX_LENGTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("User name must be {min}-{max} characters (got {actual})")]
    InvalidLength {
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("User name may only contain letters, digits, '-' and '_'")]
    InvalidCharacter,

    #[error("User name must start with a letter or digit")]
    InvalidStart,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserName(String);

impl UserName {
    pub fn new(raw: impl Into<String>) -> Result<Self, UserNameError> {
        let name = raw.into().trim().to_lowercase();

        let len = name.chars().count();
        if !(USER_NAME_MIN_LENGTH..=USER_NAME_MAX_LENGTH).contains(&len) {
            return Err(UserNameError::InvalidLength {
                min: USER_NAME_MIN_LENGTH,
                max: USER_NAME_MAX_LENGTH,
                actual: len,
            });
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(UserNameError::InvalidCharacter);
        }

        // First char rule keeps generated and user-chosen names uniform
        if !name.chars().next().is_some_and(|c| c.is_ascii_alphanumeric()) {
            return Err(UserNameError::InvalidStart);
        }

        Ok(Self(name))
    }

    /// Wrap a value that already passed validation (database reads).
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
