//! Master option persistence trait

use async_trait::async_trait;

use crate::model::{MasterOption, MasterOptionData};

/// Master option storage operations
#[async_trait]
pub trait MasterPersistence: Send + Sync {
    /// All options ordered by category, sort order, then id
    async fn master_find_all(&self) -> anyhow::Result<Vec<MasterOption>>;

    async fn master_find_by_category(&self, category_key: &str)
    -> anyhow::Result<Vec<MasterOption>>;

    async fn master_find_by_id(&self, id: i32) -> anyhow::Result<Option<MasterOption>>;

    async fn master_create(&self, data: &MasterOptionData) -> anyhow::Result<MasterOption>;

    async fn master_update(
        &self,
        id: i32,
        data: &MasterOptionData,
    ) -> anyhow::Result<Option<MasterOption>>;

    async fn master_delete(&self, id: i32) -> anyhow::Result<bool>;
}
