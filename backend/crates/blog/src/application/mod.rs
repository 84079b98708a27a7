//! Application Module

pub mod posts;

pub use posts::PostUseCase;
