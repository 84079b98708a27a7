//! Domain Layer
//!
//! Entities, value objects, the token codec, the access policy engine,
//! and repository traits.

pub mod entity;
pub mod policy;
pub mod repository;
pub mod token;
pub mod value_object;

// Re-exports
pub use entity::user::{FederatedIdentity, User};
pub use policy::{AccessPolicy, AccessRule, Decision, Requirement};
pub use repository::UserRepository;
pub use token::{Claims, TokenCodec, TokenError};
