//! Presentation Module
//!
//! HTTP layer: DTOs, handlers, the request authentication middleware
//! and routers.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{AuthContext, AuthLayerState, authenticate};
pub use router::{admin_router, auth_router};
