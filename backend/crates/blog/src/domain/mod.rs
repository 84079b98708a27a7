//! Domain Module

pub mod entity;
pub mod repository;

pub use entity::post::Post;
pub use repository::{Page, PostQuery, PostRepository, PostSort};
