//! Auth Routers

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::domain::token::TokenCodec;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the auth router with PostgreSQL repository
pub fn auth_router(repo: PgUserRepository, codec: Arc<TokenCodec>, config: AuthConfig) -> Router {
    auth_router_generic(repo, codec, config)
}

/// Create the admin router with PostgreSQL repository
pub fn admin_router(repo: PgUserRepository, codec: Arc<TokenCodec>, config: AuthConfig) -> Router {
    admin_router_generic(repo, codec, config)
}

/// Create a generic auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, codec: Arc<TokenCodec>, config: AuthConfig) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        codec,
        config: Arc::new(config),
    };

    Router::new()
        .route("/login", post(handlers::login::<R>))
        .route("/register", post(handlers::register::<R>))
        .route("/federated", post(handlers::federated_login::<R>))
        .route("/me", get(handlers::me))
        .with_state(state)
}

/// Create a generic admin router for any repository implementation
pub fn admin_router_generic<R>(repo: R, codec: Arc<TokenCodec>, config: AuthConfig) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        codec,
        config: Arc::new(config),
    };

    Router::new()
        .route("/users", get(handlers::list_users::<R>))
        .route(
            "/users/{username}",
            get(handlers::get_user::<R>).delete(handlers::delete_user::<R>),
        )
        .with_state(state)
}
