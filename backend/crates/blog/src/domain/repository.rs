//! Repository Traits

use kernel::id::PostId;

use crate::domain::entity::post::Post;
use crate::error::{BlogError, BlogResult};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Sort key for post listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostSort {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
}

impl PostSort {
    pub fn from_key(key: &str) -> Result<Self, BlogError> {
        match key {
            "createdAt" => Ok(PostSort::CreatedAt),
            "updatedAt" => Ok(PostSort::UpdatedAt),
            "title" => Ok(PostSort::Title),
            other => Err(BlogError::Validation(format!("Unknown sort key: {other}"))),
        }
    }
}

/// Listing parameters: pagination, sort, optional title search and
/// optional author filter.
#[derive(Debug, Clone)]
pub struct PostQuery {
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
    pub sort: PostSort,
    /// Case-insensitive substring match on the title
    pub search: Option<String>,
    pub author: Option<String>,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort: PostSort::default(),
            search: None,
            author: None,
        }
    }
}

impl PostQuery {
    /// Clamp pagination into valid bounds.
    pub fn normalized(mut self) -> Self {
        self.page = self.page.max(1);
        self.page_size = self.page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }
}

/// One page of results
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size))
    }
}

/// Post repository trait
#[trait_variant::make(PostRepository: Send)]
pub trait LocalPostRepository {
    async fn create(&self, post: &Post) -> BlogResult<()>;

    async fn find_by_id(&self, post_id: &PostId) -> BlogResult<Option<Post>>;

    /// Persist edited title/content; `PostNotFound` if the row is gone
    async fn update(&self, post: &Post) -> BlogResult<()>;

    /// Delete by id; `PostNotFound` if nothing was deleted
    async fn delete(&self, post_id: &PostId) -> BlogResult<()>;

    async fn list(&self, query: &PostQuery) -> BlogResult<Page<Post>>;
}
