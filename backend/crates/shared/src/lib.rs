//! Shared Kernel
//!
//! The smallest domain-crossing core shared by every backend crate:
//! - Unified error type and HTTP-status-mapped error classification
//! - Type-safe entity ID wrappers
//!
//! Anything that lives here must have a single, stable meaning across
//! all domains. Domain-specific behavior belongs in the domain crates.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;

pub use error::app_error::{AppError, AppResult};
pub use error::kind::ErrorKind;
