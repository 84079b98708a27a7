//! Email Value Object
//!
//! Syntactic validation only; deliverability is not this type's problem.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// RFC 5321 overall length cap
const EMAIL_MAX_LENGTH: usize = 254;
/// RFC 5321 local-part length cap
const LOCAL_PART_MAX_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("Email cannot be empty")]
    Empty,

    #[error("Email must be at most {EMAIL_MAX_LENGTH} characters")]
    TooLong,

    #[error("Invalid email format")]
    InvalidFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    pub fn new(raw: impl Into<String>) -> Result<Self, EmailError> {
        let email = raw.into().trim().to_lowercase();

        if email.is_empty() {
            return Err(EmailError::Empty);
        }
        if email.len() > EMAIL_MAX_LENGTH {
            return Err(EmailError::TooLong);
        }

        let Some((local, domain)) = email.split_once('@') else {
            return Err(EmailError::InvalidFormat);
        };

        if local.is_empty() || local.len() > LOCAL_PART_MAX_LENGTH || local.contains('@') {
            return Err(EmailError::InvalidFormat);
        }

        let domain_ok = domain.contains('.')
            && !domain.starts_with(['.', '-'])
            && !domain.ends_with(['.', '-'])
            && domain
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
        if !domain_ok {
            return Err(EmailError::InvalidFormat);
        }

        Ok(Self(email))
    }

    /// Wrap a value that already passed validation (database reads).
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Part before the '@', used to seed generated user names.
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or("")
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
