//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use kernel::id::PostId;

use crate::domain::entity::post::Post;
use crate::domain::repository::{Page, PostQuery, PostRepository, PostSort};
use crate::error::{BlogError, BlogResult};

/// PostgreSQL-backed post repository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PostRepository for PgPostRepository {
    async fn create(&self, post: &Post) -> BlogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (
                post_id,
                author,
                title,
                content,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(post.post_id.as_uuid())
        .bind(&post.author)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, post_id: &PostId) -> BlogResult<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT post_id, author, title, content, created_at, updated_at
            FROM posts
            WHERE post_id = $1
            "#,
        )
        .bind(post_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PostRow::into_post))
    }

    async fn update(&self, post: &Post) -> BlogResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE posts
            SET title = $2, content = $3, updated_at = $4
            WHERE post_id = $1
            "#,
        )
        .bind(post.post_id.as_uuid())
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(BlogError::PostNotFound);
        }
        Ok(())
    }

    async fn delete(&self, post_id: &PostId) -> BlogResult<()> {
        let deleted = sqlx::query("DELETE FROM posts WHERE post_id = $1")
            .bind(post_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(BlogError::PostNotFound);
        }
        Ok(())
    }

    async fn list(&self, query: &PostQuery) -> BlogResult<Page<Post>> {
        let mut count_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM posts");
        push_filters(&mut count_builder, query);

        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT post_id, author, title, content, created_at, updated_at FROM posts",
        );
        push_filters(&mut builder, query);

        // Sort column comes from the enum, never from user input
        builder.push(match query.sort {
            PostSort::CreatedAt => " ORDER BY created_at DESC",
            PostSort::UpdatedAt => " ORDER BY updated_at DESC",
            PostSort::Title => " ORDER BY title ASC",
        });

        builder.push(" LIMIT ");
        builder.push_bind(i64::from(query.page_size));
        builder.push(" OFFSET ");
        builder.push_bind(query.offset());

        let rows = builder
            .build_query_as::<PostRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            items: rows.into_iter().map(PostRow::into_post).collect(),
            page: query.page,
            page_size: query.page_size,
            total: u64::try_from(total).unwrap_or(0),
        })
    }
}

fn push_filters(builder: &mut QueryBuilder<Postgres>, query: &PostQuery) {
    let mut has_where = false;

    if let Some(search) = &query.search {
        builder.push(" WHERE title ILIKE ");
        builder.push_bind(format!("%{}%", escape_like(search)));
        has_where = true;
    }

    if let Some(author) = &query.author {
        builder.push(if has_where { " AND " } else { " WHERE " });
        builder.push("author = ");
        builder.push_bind(author.clone());
    }
}

/// Escape LIKE wildcards so a search term matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[derive(sqlx::FromRow)]
struct PostRow {
    post_id: Uuid,
    author: String,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self) -> Post {
        Post {
            post_id: PostId::from_uuid(self.post_id),
            author: self.author,
            title: self.title,
            content: self.content,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
