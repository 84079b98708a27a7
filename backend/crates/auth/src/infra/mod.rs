//! Infrastructure Module

pub mod postgres;

pub use postgres::PgUserRepository;
