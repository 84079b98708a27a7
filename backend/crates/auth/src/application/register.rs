//! Register Use Case
//!
//! Creates a password-login user account with a default role.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, role::Role, user_name::UserName};
use crate::error::{AuthError, AuthResult};

/// Registration input
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Role to assign; the configured default when omitted
    pub role: Option<Role>,
}

/// Register use case
pub struct RegisterUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> RegisterUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<User> {
        let username =
            UserName::new(input.username).map_err(|e| AuthError::Validation(e.to_string()))?;
        let email = Email::new(input.email).map_err(|e| AuthError::Validation(e.to_string()))?;

        if self.repo.exists_by_username(&username).await? {
            return Err(AuthError::DuplicateUsername);
        }
        if self.repo.exists_by_email(&email).await? {
            return Err(AuthError::DuplicateEmail);
        }

        let password =
            ClearTextPassword::new(input.password).map_err(|e| AuthError::Validation(e.to_string()))?;
        let password_hash = password
            .hash(self.config.pepper())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let role = input.role.unwrap_or(self.config.default_role);
        let user = User::new_local(username, email, password_hash, role);

        // The exists checks race under concurrency; the database
        // unique constraints are the authority and map back to the
        // same Duplicate* errors.
        self.repo.create(&user).await?;

        tracing::info!(
            username = %user.username,
            role = %user.primary_role(),
            "User registered"
        );

        Ok(user)
    }
}
