//! Blog Routers

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use std::sync::Arc;

use crate::domain::repository::PostRepository;
use crate::infra::postgres::PgPostRepository;
use crate::presentation::handlers::{self, BlogAppState};

/// Create the public post reading router with PostgreSQL repository
pub fn posts_router(repo: PgPostRepository) -> Router {
    posts_router_generic(repo)
}

/// Create the author router with PostgreSQL repository
pub fn author_router(repo: PgPostRepository) -> Router {
    author_router_generic(repo)
}

/// Create the reader feed router with PostgreSQL repository
pub fn reader_router(repo: PgPostRepository) -> Router {
    reader_router_generic(repo)
}

/// Post reading routes for any repository implementation
pub fn posts_router_generic<R>(repo: R) -> Router
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    let state = BlogAppState {
        repo: Arc::new(repo),
    };

    Router::new()
        .route("/", get(handlers::list_posts::<R>))
        .route("/{id}", get(handlers::get_post::<R>))
        .with_state(state)
}

/// Authoring routes for any repository implementation
pub fn author_router_generic<R>(repo: R) -> Router
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    let state = BlogAppState {
        repo: Arc::new(repo),
    };

    Router::new()
        .route(
            "/posts",
            post(handlers::create_post::<R>).get(handlers::my_posts::<R>),
        )
        .route(
            "/posts/{id}",
            put(handlers::update_post::<R>).delete(handlers::delete_post::<R>),
        )
        .with_state(state)
}

/// Reader feed routes for any repository implementation
pub fn reader_router_generic<R>(repo: R) -> Router
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    let state = BlogAppState {
        repo: Arc::new(repo),
    };

    Router::new()
        .route("/feed", get(handlers::list_posts::<R>))
        .with_state(state)
}
