//! HTTP Handlers
//!
//! Author identity always comes from the request context injected by
//! the authentication middleware; it is never read from the body.

use axum::Extension;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use std::sync::Arc;
use uuid::Uuid;

use auth::presentation::middleware::AuthContext;
use kernel::id::PostId;

use crate::application::posts::PostUseCase;
use crate::domain::repository::PostRepository;
use crate::error::{BlogError, BlogResult};
use crate::presentation::dto::{
    CreatePostRequest, ListPostsParams, PostPageResponse, PostResponse, UpdatePostRequest,
};

/// Shared state for blog handlers
#[derive(Clone)]
pub struct BlogAppState<R>
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

fn require_context(ctx: Option<Extension<AuthContext>>) -> BlogResult<AuthContext> {
    ctx.map(|Extension(ctx)| ctx)
        .ok_or(BlogError::Unauthenticated)
}

// ============================================================================
// Reading
// ============================================================================

/// GET /api/posts
pub async fn list_posts<R>(
    State(state): State<BlogAppState<R>>,
    Query(params): Query<ListPostsParams>,
) -> BlogResult<Json<PostPageResponse>>
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    let use_case = PostUseCase::new(state.repo.clone());
    let page = use_case.list(params.into_query()?).await?;

    Ok(Json(PostPageResponse::from_page(&page)))
}

/// GET /api/posts/{id}
pub async fn get_post<R>(
    State(state): State<BlogAppState<R>>,
    Path(post_id): Path<Uuid>,
) -> BlogResult<Json<PostResponse>>
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    let use_case = PostUseCase::new(state.repo.clone());
    let post = use_case.get(&PostId::from_uuid(post_id)).await?;

    Ok(Json(PostResponse::from_post(&post)))
}

// ============================================================================
// Authoring
// ============================================================================

/// POST /api/author/posts
pub async fn create_post<R>(
    State(state): State<BlogAppState<R>>,
    ctx: Option<Extension<AuthContext>>,
    Json(req): Json<CreatePostRequest>,
) -> BlogResult<(StatusCode, Json<PostResponse>)>
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    let ctx = require_context(ctx)?;

    let use_case = PostUseCase::new(state.repo.clone());
    let post = use_case.create(&ctx, req.title, req.content).await?;

    Ok((StatusCode::CREATED, Json(PostResponse::from_post(&post))))
}

/// GET /api/author/posts
pub async fn my_posts<R>(
    State(state): State<BlogAppState<R>>,
    ctx: Option<Extension<AuthContext>>,
    Query(params): Query<ListPostsParams>,
) -> BlogResult<Json<PostPageResponse>>
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    let ctx = require_context(ctx)?;

    let use_case = PostUseCase::new(state.repo.clone());
    let page = use_case.my_posts(&ctx, params.into_query()?).await?;

    Ok(Json(PostPageResponse::from_page(&page)))
}

/// PUT /api/author/posts/{id}
pub async fn update_post<R>(
    State(state): State<BlogAppState<R>>,
    ctx: Option<Extension<AuthContext>>,
    Path(post_id): Path<Uuid>,
    Json(req): Json<UpdatePostRequest>,
) -> BlogResult<Json<PostResponse>>
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    let ctx = require_context(ctx)?;

    let use_case = PostUseCase::new(state.repo.clone());
    let post = use_case
        .update(&ctx, &PostId::from_uuid(post_id), req.title, req.content)
        .await?;

    Ok(Json(PostResponse::from_post(&post)))
}

/// DELETE /api/author/posts/{id}
pub async fn delete_post<R>(
    State(state): State<BlogAppState<R>>,
    ctx: Option<Extension<AuthContext>>,
    Path(post_id): Path<Uuid>,
) -> BlogResult<StatusCode>
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    let ctx = require_context(ctx)?;

    let use_case = PostUseCase::new(state.repo.clone());
    use_case.delete(&ctx, &PostId::from_uuid(post_id)).await?;

    Ok(StatusCode::NO_CONTENT)
}
