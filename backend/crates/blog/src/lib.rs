//! Blog (Posts) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Post entity, listing queries, repository trait
//! - `application/` - Post use cases with authorship checks
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! ## Features
//! - Post CRUD with author ownership (author or admin may modify)
//! - Paginated listings with sort by creation time, update time or
//!   title, and case-insensitive title search

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use error::{BlogError, BlogResult};
pub use infra::postgres::PgPostRepository;
pub use presentation::router::{author_router, posts_router, reader_router};
