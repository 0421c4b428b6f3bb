//! Insight record persistence trait

use async_trait::async_trait;

use crate::model::{Insight, InsightData};
use crate::query::InsightSearch;

/// Insight record storage operations
///
/// Writes that collide with an existing `insight_id` fail with
/// `InsightError::Conflict`.
#[async_trait]
pub trait InsightPersistence: Send + Sync {
    async fn insight_find_by_id(&self, id: i32) -> anyhow::Result<Option<Insight>>;

    async fn insight_find_by_insight_id(&self, insight_id: &str)
    -> anyhow::Result<Option<Insight>>;

    /// List records matching `search`, ordered by ascending id
    async fn insight_search(&self, search: &InsightSearch) -> anyhow::Result<Vec<Insight>>;

    async fn insight_create(&self, data: &InsightData) -> anyhow::Result<Insight>;

    /// Replace every editable field in a single statement.
    /// Returns `None` when no record has this id.
    async fn insight_update(&self, id: i32, data: &InsightData) -> anyhow::Result<Option<Insight>>;

    /// Returns `false` when no record has this id
    async fn insight_delete(&self, id: i32) -> anyhow::Result<bool>;

    /// Check whether `insight_id` is used by any record other than `exclude_id`
    async fn insight_exists_insight_id(
        &self,
        insight_id: &str,
        exclude_id: Option<i32>,
    ) -> anyhow::Result<bool>;
}
