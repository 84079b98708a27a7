//! Authenticate Use Case
//!
//! One capability - "produce a verified identity" - with two variants:
//! password login and federated login. Both converge on the same token
//! issuance, so downstream a session is indistinguishable regardless
//! of origin.

use std::sync::Arc;

use chrono::Utc;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::token::TokenCodec;
use crate::domain::value_object::{email::Email, role::RoleSet, user_name::UserName};
use crate::error::{AuthError, AuthResult};

/// Profile supplied by an external identity provider after it has
/// verified the login. The (provider, subject) pair is the stable key.
#[derive(Debug, Clone)]
pub struct FederatedProfile {
    pub provider: String,
    pub subject: String,
    pub email: String,
    pub display_name: Option<String>,
}

/// The two ways a caller can prove who they are.
#[derive(Debug)]
pub enum LoginMethod {
    Password { username: String, password: String },
    Federated(FederatedProfile),
}

/// Authentication result
#[derive(Debug)]
pub struct AuthenticateOutput {
    /// Signed bearer token
    pub token: String,
    pub username: String,
    pub roles: RoleSet,
}

/// Authenticate use case
pub struct AuthenticateUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    codec: Arc<TokenCodec>,
    config: Arc<AuthConfig>,
}

impl<R> AuthenticateUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, codec: Arc<TokenCodec>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            codec,
            config,
        }
    }

    pub async fn execute(&self, method: LoginMethod) -> AuthResult<AuthenticateOutput> {
        let user = match method {
            LoginMethod::Password { username, password } => {
                self.verify_password_login(username, password).await?
            }
            LoginMethod::Federated(profile) => self.resolve_federated(profile).await?,
        };

        let token = self.codec.issue(user.username.as_str(), &user.roles, Utc::now());

        tracing::info!(
            username = %user.username,
            federated = user.is_federated(),
            "User authenticated"
        );

        Ok(AuthenticateOutput {
            token,
            username: user.username.as_str().to_string(),
            roles: user.roles,
        })
    }

    /// Password path. Every failure collapses into
    /// `InvalidCredentials` so the caller cannot probe for usernames.
    async fn verify_password_login(&self, username: String, password: String) -> AuthResult<User> {
        let username = UserName::new(username).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .repo
            .find_by_username(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // Federated-only accounts have no hash and cannot password-login
        let stored_hash = user
            .password_hash
            .as_ref()
            .ok_or(AuthError::InvalidCredentials)?;

        let presented =
            ClearTextPassword::new(password).map_err(|_| AuthError::InvalidCredentials)?;

        let matches = stored_hash
            .verify(&presented, self.config.pepper())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Federated path: resolve the provider profile to an internal
    /// user, creating one on first sighting. Idempotent - repeated
    /// logins with the same (provider, subject) resolve to one user.
    async fn resolve_federated(&self, profile: FederatedProfile) -> AuthResult<User> {
        if let Some(user) = self
            .repo
            .find_by_federated(&profile.provider, &profile.subject)
            .await?
        {
            return Ok(user);
        }

        let email = Email::new(&profile.email)
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        // The generated username can collide with an unrelated user;
        // one retry with a fresh suffix covers that. The federated key
        // itself is race-free via create_federated_if_absent.
        let mut last_err = AuthError::Internal("Federated resolution failed".to_string());
        for _ in 0..2 {
            let username = generate_username(&email, &profile.provider)
                .map_err(|e| AuthError::Validation(e.to_string()))?;

            let candidate = User::new_federated(
                username,
                email.clone(),
                self.config.default_role,
                &profile.provider,
                &profile.subject,
            );

            match self.repo.create_federated_if_absent(&candidate).await {
                Ok(user) => {
                    if user.user_id == candidate.user_id {
                        tracing::info!(
                            username = %user.username,
                            provider = %profile.provider,
                            "Created user from federated login"
                        );
                    }
                    return Ok(user);
                }
                Err(AuthError::DuplicateUsername) => {
                    last_err = AuthError::DuplicateUsername;
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_err)
    }
}

/// Derive a username from the email local part plus a random suffix.
fn generate_username(
    email: &Email,
    provider: &str,
) -> Result<UserName, crate::domain::value_object::user_name::UserNameError> {
    use rand::Rng;

    let base: String = email
        .local_part()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(20)
        .collect::<String>()
        .to_lowercase();

    let base = if base.len() >= 2 {
        base
    } else {
        provider
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase()
    };
    let base = if base.len() >= 2 { base } else { "user".to_string() };

    let suffix: u32 = rand::rng().random_range(0..0x0100_0000);
    UserName::new(format!("{base}-{suffix:06x}"))
}
