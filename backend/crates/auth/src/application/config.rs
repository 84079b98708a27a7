//! Application Configuration
//!
//! Process-wide auth settings. The signing secret and TTL are loaded
//! once at startup and never change during the process lifetime.

use std::fmt;
use std::time::Duration;

use crate::domain::token::TokenCodec;
use crate::domain::value_object::role::Role;

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Secret key for token HMAC signing (32 bytes)
    pub token_secret: [u8; 32],
    /// Token lifetime (1 hour)
    pub token_ttl: Duration,
    /// Role granted on registration and first federated login
    pub default_role: Role,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: [0u8; 32],
            token_ttl: Duration::from_secs(3600),
            default_role: Role::Reader,
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Config with a random signing secret (for development and tests)
    pub fn with_random_secret() -> Self {
        Self {
            token_secret: platform::crypto::random_secret(),
            ..Default::default()
        }
    }

    /// Development config: random secret, short TTL
    pub fn development() -> Self {
        Self {
            token_ttl: Duration::from_secs(600),
            ..Self::with_random_secret()
        }
    }

    /// Build the token codec for this configuration
    pub fn codec(&self) -> TokenCodec {
        TokenCodec::new(self.token_secret, self.token_ttl)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

// Secret material never reaches log output
impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("default_role", &self.default_role)
            .field(
                "password_pepper",
                &self.password_pepper.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
