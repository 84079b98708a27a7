//! HTTP Handlers

use axum::Extension;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    AuthenticateUseCase, FederatedProfile, LoginMethod, RegisterInput, RegisterUseCase,
};
use crate::domain::repository::UserRepository;
use crate::domain::token::TokenCodec;
use crate::domain::value_object::{role::Role, user_name::UserName};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    FederatedLoginRequest, LoginRequest, MeResponse, RegisterRequest, RegisterResponse,
    TokenResponse, UserSummary,
};
use crate::presentation::middleware::AuthContext;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub codec: Arc<TokenCodec>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<TokenResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case =
        AuthenticateUseCase::new(state.repo.clone(), state.codec.clone(), state.config.clone());

    let output = use_case
        .execute(LoginMethod::Password {
            username: req.username,
            password: req.password,
        })
        .await?;

    Ok(Json(TokenResponse {
        token: output.token,
        token_type: "Bearer",
        expires_in: state.codec.ttl().as_secs(),
        username: output.username,
        roles: output.roles.iter().map(|r| r.code().to_string()).collect(),
    }))
}

// ============================================================================
// Registration
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<RegisterResponse>)>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let role = req
        .role
        .as_deref()
        .map(Role::from_code)
        .transpose()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    let user = use_case
        .execute(RegisterInput {
            username: req.username,
            email: req.email,
            password: req.password,
            role,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: user.user_id.as_uuid().to_string(),
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            role: user.primary_role().code().to_string(),
        }),
    ))
}

// ============================================================================
// Federated Login
// ============================================================================

/// POST /api/auth/federated
///
/// Called after the external provider has verified the login; resolves
/// the provider profile to an internal user and issues a token.
pub async fn federated_login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<FederatedLoginRequest>,
) -> AuthResult<Json<TokenResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case =
        AuthenticateUseCase::new(state.repo.clone(), state.codec.clone(), state.config.clone());

    let output = use_case
        .execute(LoginMethod::Federated(FederatedProfile {
            provider: req.provider,
            subject: req.subject,
            email: req.email,
            display_name: req.display_name,
        }))
        .await?;

    Ok(Json(TokenResponse {
        token: output.token,
        token_type: "Bearer",
        expires_in: state.codec.ttl().as_secs(),
        username: output.username,
        roles: output.roles.iter().map(|r| r.code().to_string()).collect(),
    }))
}

// ============================================================================
// Current Identity
// ============================================================================

/// GET /api/auth/me
pub async fn me(ctx: Option<Extension<AuthContext>>) -> AuthResult<Json<MeResponse>> {
    let Extension(ctx) = ctx.ok_or(AuthError::Unauthenticated)?;

    Ok(Json(MeResponse {
        username: ctx.subject,
        roles: ctx.roles.iter().map(|r| r.code().to_string()).collect(),
    }))
}

// ============================================================================
// Admin
// ============================================================================

/// GET /api/admin/users
pub async fn list_users<R>(
    State(state): State<AuthAppState<R>>,
) -> AuthResult<Json<Vec<UserSummary>>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let users = state.repo.list().await?;

    Ok(Json(users.iter().map(UserSummary::from_user).collect()))
}

/// GET /api/admin/users/{username}
pub async fn get_user<R>(
    State(state): State<AuthAppState<R>>,
    Path(username): Path<String>,
) -> AuthResult<Json<UserSummary>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let username = UserName::new(username).map_err(|_| AuthError::UserNotFound)?;

    let user = state
        .repo
        .find_by_username(&username)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    Ok(Json(UserSummary::from_user(&user)))
}

/// DELETE /api/admin/users/{username}
pub async fn delete_user<R>(
    State(state): State<AuthAppState<R>>,
    Path(username): Path<String>,
) -> AuthResult<StatusCode>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let username = UserName::new(username).map_err(|_| AuthError::UserNotFound)?;

    state.repo.delete_by_username(&username).await?;

    Ok(StatusCode::NO_CONTENT)
}
