//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Token response, shared by login and federated login
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub token_type: &'static str,
    /// Seconds until the token expires
    pub expires_in: u64,
    pub username: String,
    pub roles: Vec<String>,
}

// ============================================================================
// Registration
// ============================================================================

/// Registration request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// One of `reader`, `author`, `admin`; the default role when omitted
    pub role: Option<String>,
}

/// Registration response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub role: String,
}

// ============================================================================
// Federated Login
// ============================================================================

/// Federated login request, posted by the provider callback handler
/// after the external provider has verified the login.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FederatedLoginRequest {
    pub provider: String,
    pub subject: String,
    pub email: String,
    pub display_name: Option<String>,
}

// ============================================================================
// Current Identity
// ============================================================================

/// Response for the current authenticated identity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub username: String,
    pub roles: Vec<String>,
}

// ============================================================================
// Admin
// ============================================================================

/// User summary for the admin listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
    pub federated: bool,
    pub created_at: String,
}

impl UserSummary {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.user_id.as_uuid().to_string(),
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            roles: user.roles.iter().map(|r| r.code().to_string()).collect(),
            federated: user.is_federated(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}
