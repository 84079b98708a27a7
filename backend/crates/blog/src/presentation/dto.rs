//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::post::Post;
use crate::domain::repository::{DEFAULT_PAGE_SIZE, Page, PostQuery, PostSort};
use crate::error::BlogResult;

// ============================================================================
// Posts
// ============================================================================

/// Create post request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

/// Update post request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: String,
    pub content: String,
}

/// Post response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub post_id: String,
    pub author: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

impl PostResponse {
    pub fn from_post(post: &Post) -> Self {
        Self {
            post_id: post.post_id.as_uuid().to_string(),
            author: post.author.clone(),
            title: post.title.clone(),
            content: post.content.clone(),
            created_at: post.created_at.to_rfc3339(),
            updated_at: post.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Listing
// ============================================================================

/// Query parameters for post listings
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// One of `createdAt`, `updatedAt`, `title`
    pub sort: Option<String>,
    pub search: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl ListPostsParams {
    pub fn into_query(self) -> BlogResult<PostQuery> {
        let sort = match self.sort.as_deref() {
            Some(key) => PostSort::from_key(key)?,
            None => PostSort::default(),
        };

        Ok(PostQuery {
            page: self.page,
            page_size: self.page_size,
            sort,
            search: self.search.filter(|s| !s.trim().is_empty()),
            author: None,
        })
    }
}

/// One page of post responses
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPageResponse {
    pub items: Vec<PostResponse>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl PostPageResponse {
    pub fn from_page(page: &Page<Post>) -> Self {
        Self {
            items: page.items.iter().map(PostResponse::from_post).collect(),
            page: page.page,
            page_size: page.page_size,
            total: page.total,
            total_pages: page.total_pages(),
        }
    }
}
