//! Insight Auth - Authentication for Insight Manager
//!
//! This crate provides:
//! - JWT token issue and validation with a validation cache
//! - Password verification against stored bcrypt hashes
//! - The per-request auth context

pub mod model;
pub mod service;

// Re-export commonly used types
pub use model::*;
