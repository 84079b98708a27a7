//! Application Module
//!
//! Use cases orchestrating domain objects and repositories.

pub mod authenticate;
pub mod config;
pub mod register;

pub use authenticate::{AuthenticateOutput, AuthenticateUseCase, FederatedProfile, LoginMethod};
pub use config::AuthConfig;
pub use register::{RegisterInput, RegisterUseCase};
