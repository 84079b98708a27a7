//! Repository Traits
//!
//! Persistence interface for users. Implementations live in the
//! infrastructure layer; uniqueness of username, email and the
//! (provider, subject) pair is enforced there so concurrent creations
//! cannot race into duplicates.

use crate::domain::entity::user::User;
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user; fails on duplicate username or email
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by username
    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<User>>;

    /// Check if a username is taken
    async fn exists_by_username(&self, username: &UserName) -> AuthResult<bool>;

    /// Check if an email is registered
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Find user by federated (provider, subject) mapping key
    async fn find_by_federated(&self, provider: &str, subject: &str) -> AuthResult<Option<User>>;

    /// Insert a federated user unless the (provider, subject) key
    /// already exists, and return the winning row either way.
    /// This is the idempotence anchor for federated resolution.
    async fn create_federated_if_absent(&self, user: &User) -> AuthResult<User>;

    /// List all users (admin surface)
    async fn list(&self) -> AuthResult<Vec<User>>;

    /// Delete a user by username (admin surface); `UserNotFound` if no
    /// row was deleted
    async fn delete_by_username(&self, username: &UserName) -> AuthResult<()>;
}
