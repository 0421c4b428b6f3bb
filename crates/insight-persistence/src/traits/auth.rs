//! Auth persistence trait

use async_trait::async_trait;

use crate::model::UserInfo;

/// User account storage operations
#[async_trait]
pub trait AuthPersistence: Send + Sync {
    /// Find a user by username
    async fn user_find_by_username(&self, username: &str) -> anyhow::Result<Option<UserInfo>>;

    /// Find a user by id
    async fn user_find_by_id(&self, id: i32) -> anyhow::Result<Option<UserInfo>>;

    /// Create a new user
    async fn user_create(
        &self,
        username: &str,
        password_hash: &str,
        role: &str,
    ) -> anyhow::Result<UserInfo>;
}
