//! User Entity
//!
//! One internal identity regardless of login origin. Password-login
//! users carry a hash; federated-only users carry a provider link and
//! no hash. Both feed the same token issuance path.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;

use crate::domain::value_object::{
    email::Email,
    role::{Role, RoleSet},
    user_name::UserName,
};

/// Link to an external identity provider account.
///
/// (provider, subject) is the stable mapping key for federated logins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedIdentity {
    /// Provider name, e.g. "google"
    pub provider: String,
    /// Provider-issued stable unique id
    pub subject: String,
}

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique, immutable after creation
    pub username: UserName,
    pub email: Email,
    /// Absent for federated-only users
    pub password_hash: Option<HashedPassword>,
    /// Never empty for a stored user; first entry is the primary role
    pub roles: RoleSet,
    pub federated: Option<FederatedIdentity>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a password-login user.
    pub fn new_local(
        username: UserName,
        email: Email,
        password_hash: HashedPassword,
        role: Role,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            username,
            email,
            password_hash: Some(password_hash),
            roles: RoleSet::single(role),
            federated: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a user on first federated login.
    pub fn new_federated(
        username: UserName,
        email: Email,
        role: Role,
        provider: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            username,
            email,
            password_hash: None,
            roles: RoleSet::single(role),
            federated: Some(FederatedIdentity {
                provider: provider.into(),
                subject: subject.into(),
            }),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_federated(&self) -> bool {
        self.federated.is_some()
    }

    /// Primary role for display; authorization uses the full set.
    pub fn primary_role(&self) -> Role {
        self.roles.primary().unwrap_or_default()
    }

    pub fn grant_role(&mut self, role: Role) {
        self.roles.insert(role);
        self.updated_at = Utc::now();
    }
}
