//! Post Use Cases
//!
//! Authorship rule: a post may be edited or deleted by its author or
//! by an admin. The caller identity comes from the verified request
//! context, never from the request body.

use std::sync::Arc;

use auth::domain::value_object::role::Role;
use auth::presentation::middleware::AuthContext;
use kernel::id::PostId;

use crate::domain::entity::post::Post;
use crate::domain::repository::{Page, PostQuery, PostRepository};
use crate::error::{BlogError, BlogResult};

/// Post use cases
pub struct PostUseCase<R>
where
    R: PostRepository,
{
    repo: Arc<R>,
}

impl<R> PostUseCase<R>
where
    R: PostRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, caller: &AuthContext, title: String, content: String) -> BlogResult<Post> {
        let post = Post::new(caller.subject.as_str(), title, content)?;
        self.repo.create(&post).await?;

        tracing::info!(post_id = %post.post_id, author = %post.author, "Post created");

        Ok(post)
    }

    pub async fn get(&self, post_id: &PostId) -> BlogResult<Post> {
        self.repo
            .find_by_id(post_id)
            .await?
            .ok_or(BlogError::PostNotFound)
    }

    pub async fn update(
        &self,
        caller: &AuthContext,
        post_id: &PostId,
        title: String,
        content: String,
    ) -> BlogResult<Post> {
        let mut post = self.get(post_id).await?;
        check_ownership(caller, &post)?;

        post.edit(title, content)?;
        self.repo.update(&post).await?;

        Ok(post)
    }

    pub async fn delete(&self, caller: &AuthContext, post_id: &PostId) -> BlogResult<()> {
        let post = self.get(post_id).await?;
        check_ownership(caller, &post)?;

        self.repo.delete(post_id).await?;

        tracing::info!(post_id = %post_id, author = %post.author, "Post deleted");

        Ok(())
    }

    pub async fn list(&self, query: PostQuery) -> BlogResult<Page<Post>> {
        self.repo.list(&query.normalized()).await
    }

    /// Posts authored by the caller
    pub async fn my_posts(&self, caller: &AuthContext, query: PostQuery) -> BlogResult<Page<Post>> {
        let query = PostQuery {
            author: Some(caller.subject.clone()),
            ..query
        };
        self.repo.list(&query.normalized()).await
    }
}

fn check_ownership(caller: &AuthContext, post: &Post) -> BlogResult<()> {
    if post.is_authored_by(&caller.subject) || caller.roles.contains(Role::Admin) {
        Ok(())
    } else {
        Err(BlogError::NotOwner)
    }
}
