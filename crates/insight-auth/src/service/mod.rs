//! Authentication service implementations

pub mod auth;
pub mod user;
