//! Insight Persistence - Database entities and persistence layer
//!
//! This crate provides:
//! - SeaORM entity definitions
//! - The insight search query builder
//! - Persistence trait abstractions and the SQL backend
//! - Domain model types for persistence operations

pub mod entity;
pub mod model;
pub mod query;
pub mod sql;
pub mod traits;

// Re-export sea-orm for convenience
pub use sea_orm;

pub use entity::prelude::*;

pub use traits::{AuthPersistence, InsightPersistence, MasterPersistence, PersistenceService};

pub use sql::ExternalDbPersistService;

pub use model::{Insight, InsightData, MasterOption, MasterOptionData, UserInfo};
pub use query::InsightSearch;
