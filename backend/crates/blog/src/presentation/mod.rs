//! Presentation Module

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::BlogAppState;
pub use router::{author_router, posts_router, reader_router};
