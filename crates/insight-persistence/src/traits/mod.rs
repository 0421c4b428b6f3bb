//! Persistence traits for the storage abstraction layer
//!
//! Handlers and services depend on these traits rather than on SeaORM
//! directly, so that the record store can be swapped or faked.

pub mod auth;
pub mod insight;
pub mod master;

pub use auth::AuthPersistence;
pub use insight::InsightPersistence;
pub use master::MasterPersistence;

use async_trait::async_trait;

/// Unified persistence service trait
#[async_trait]
pub trait PersistenceService:
    InsightPersistence + MasterPersistence + AuthPersistence + Send + Sync
{
    /// Health check for the storage backend
    async fn health_check(&self) -> anyhow::Result<()>;
}
