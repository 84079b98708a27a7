//! Value Object Module

pub mod email;
pub mod role;
pub mod user_name;
