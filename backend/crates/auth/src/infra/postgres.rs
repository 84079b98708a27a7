//! PostgreSQL Repository Implementation
//!
//! Uniqueness of username, email and the (provider, subject) pair is
//! delegated to database constraints; unique violations are mapped
//! back to the matching `AuthError` variant by constraint name.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use kernel::id::UserId;
use platform::password::HashedPassword;

use crate::domain::entity::user::{FederatedIdentity, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, role::RoleSet, user_name::UserName};
use crate::error::{AuthError, AuthResult};

const UNIQUE_USERNAME: &str = "users_username_key";
const UNIQUE_EMAIL: &str = "users_email_key";

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                username,
                email,
                password_hash,
                roles,
                provider,
                federated_subject,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_ref().map(|h| h.as_str()))
        .bind(user.roles.to_claim())
        .bind(user.federated.as_ref().map(|f| f.provider.as_str()))
        .bind(user.federated.as_ref().map(|f| f.subject.as_str()))
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                username,
                email,
                password_hash,
                roles,
                provider,
                federated_subject,
                created_at,
                updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn exists_by_username(&self, username: &UserName) -> AuthResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
                .bind(username.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn find_by_federated(&self, provider: &str, subject: &str) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                username,
                email,
                password_hash,
                roles,
                provider,
                federated_subject,
                created_at,
                updated_at
            FROM users
            WHERE provider = $1 AND federated_subject = $2
            "#,
        )
        .bind(provider)
        .bind(subject)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn create_federated_if_absent(&self, user: &User) -> AuthResult<User> {
        let federated = user
            .federated
            .as_ref()
            .ok_or_else(|| AuthError::Internal("Federated user without provider link".into()))?;

        // ON CONFLICT keys on the (provider, federated_subject)
        // constraint only; a username collision still raises 23505 and
        // surfaces as DuplicateUsername for the caller to retry.
        let inserted = sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                username,
                email,
                password_hash,
                roles,
                provider,
                federated_subject,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (provider, federated_subject) DO NOTHING
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_ref().map(|h| h.as_str()))
        .bind(user.roles.to_claim())
        .bind(federated.provider.as_str())
        .bind(federated.subject.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?
        .rows_affected();

        if inserted == 1 {
            return Ok(user.clone());
        }

        // Lost the race; the winning row is the user
        self.find_by_federated(&federated.provider, &federated.subject)
            .await?
            .ok_or_else(|| AuthError::Internal("Federated user vanished after conflict".into()))
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                username,
                email,
                password_hash,
                roles,
                provider,
                federated_subject,
                created_at,
                updated_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_user()).collect()
    }

    async fn delete_by_username(&self, username: &UserName) -> AuthResult<()> {
        // The posts.author foreign key cascades, removing the user's
        // posts with the account
        let deleted = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username.as_str())
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(username = %username, "User deleted");

        Ok(())
    }
}

fn map_unique_violation(e: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db) = &e {
        if db.code().as_deref() == Some("23505") {
            return match db.constraint() {
                Some(UNIQUE_USERNAME) => AuthError::DuplicateUsername,
                Some(UNIQUE_EMAIL) => AuthError::DuplicateEmail,
                _ => AuthError::Database(e),
            };
        }
    }
    AuthError::Database(e)
}

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    username: String,
    email: String,
    password_hash: Option<String>,
    roles: String,
    provider: Option<String>,
    federated_subject: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let roles = RoleSet::from_claim(&self.roles)
            .map_err(|e| AuthError::Internal(format!("Invalid stored roles: {}", e)))?;

        let federated = match (self.provider, self.federated_subject) {
            (Some(provider), Some(subject)) => Some(FederatedIdentity { provider, subject }),
            (None, None) => None,
            _ => {
                return Err(AuthError::Internal(
                    "Inconsistent federated columns".to_string(),
                ));
            }
        };

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            username: UserName::from_db(self.username),
            email: Email::from_db(self.email),
            password_hash: self.password_hash.map(HashedPassword::from_phc),
            roles,
            federated,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
