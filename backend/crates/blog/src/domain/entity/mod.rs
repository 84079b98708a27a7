//! Entity Module

pub mod post;
