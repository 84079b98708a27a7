//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no domain knowledge:
//! - Password hashing and verification (Argon2id)
//! - Cryptographic utilities (secure randomness)

pub mod crypto;
pub mod password;
