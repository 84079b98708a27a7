//! Post Entity

use chrono::{DateTime, Utc};
use kernel::id::PostId;

use crate::error::{BlogError, BlogResult};

pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_CONTENT_LENGTH: usize = 100_000;

#[derive(Debug, Clone)]
pub struct Post {
    pub post_id: PostId,
    /// Username of the author, taken from the verified token subject
    pub author: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(author: impl Into<String>, title: String, content: String) -> BlogResult<Self> {
        validate_title(&title)?;
        validate_content(&content)?;

        let now = Utc::now();
        Ok(Self {
            post_id: PostId::new(),
            author: author.into(),
            title,
            content,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace title and content, bumping the update timestamp.
    pub fn edit(&mut self, title: String, content: String) -> BlogResult<()> {
        validate_title(&title)?;
        validate_content(&content)?;

        self.title = title;
        self.content = content;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_authored_by(&self, username: &str) -> bool {
        self.author == username
    }
}

fn validate_title(title: &str) -> BlogResult<()> {
    if title.trim().is_empty() {
        return Err(BlogError::Validation("Title must not be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(BlogError::Validation(format!(
            "Title must be at most {} characters",
            MAX_TITLE_LENGTH
        )));
    }
    Ok(())
}

fn validate_content(content: &str) -> BlogResult<()> {
    if content.trim().is_empty() {
        return Err(BlogError::Validation(
            "Content must not be empty".to_string(),
        ));
    }
    if content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(BlogError::Validation(format!(
            "Content must be at most {} characters",
            MAX_CONTENT_LENGTH
        )));
    }
    Ok(())
}
