//! Insight record service

use insight_common::InsightError;
use insight_persistence::{Insight, InsightData, InsightSearch, PersistenceService};

use crate::lookup::LookupTable;
use crate::transcoder;
use crate::validation::validate_insight;

fn not_found(id: i32) -> anyhow::Error {
    InsightError::not_found(format!("insight {}", id)).into()
}

fn duplicate(insight_id: &str) -> anyhow::Error {
    InsightError::Conflict(format!("duplicate insightId: {}", insight_id)).into()
}

pub async fn search<P>(persistence: &P, search: &InsightSearch) -> anyhow::Result<Vec<Insight>>
where
    P: PersistenceService + ?Sized,
{
    persistence.insight_search(search).await
}

pub async fn find_by_id<P>(persistence: &P, id: i32) -> anyhow::Result<Insight>
where
    P: PersistenceService + ?Sized,
{
    persistence
        .insight_find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Validate and insert a record. `updated_by` is set to `username`.
pub async fn create<P>(persistence: &P, data: InsightData, username: &str) -> anyhow::Result<Insight>
where
    P: PersistenceService + ?Sized,
{
    let lookup = LookupTable::load(persistence).await?;
    let mut data = validate_insight(data, &lookup)?;
    data.updated_by = Some(username.to_string());

    if let Some(insight_id) = data.insight_id.as_deref()
        && persistence.insight_exists_insight_id(insight_id, None).await?
    {
        return Err(duplicate(insight_id));
    }

    let created = persistence.insight_create(&data).await?;

    tracing::info!(id = created.id, username = %username, "Insight created");

    Ok(created)
}

/// Validate and replace every editable field of record `id`
pub async fn update<P>(
    persistence: &P,
    id: i32,
    data: InsightData,
    username: &str,
) -> anyhow::Result<Insight>
where
    P: PersistenceService + ?Sized,
{
    let lookup = LookupTable::load(persistence).await?;
    let mut data = validate_insight(data, &lookup)?;
    data.updated_by = Some(username.to_string());

    if let Some(insight_id) = data.insight_id.as_deref()
        && persistence
            .insight_exists_insight_id(insight_id, Some(id))
            .await?
    {
        return Err(duplicate(insight_id));
    }

    let updated = persistence
        .insight_update(id, &data)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(id, username = %username, "Insight updated");

    Ok(updated)
}

pub async fn delete<P>(persistence: &P, id: i32, username: &str) -> anyhow::Result<()>
where
    P: PersistenceService + ?Sized,
{
    if !persistence.insight_delete(id).await? {
        return Err(not_found(id));
    }

    tracing::info!(id, username = %username, "Insight deleted");

    Ok(())
}

/// Export the records matching `search` as a CSV document
pub async fn export_csv<P>(persistence: &P, search: &InsightSearch) -> anyhow::Result<Vec<u8>>
where
    P: PersistenceService + ?Sized,
{
    let records = persistence.insight_search(search).await?;

    tracing::info!(count = records.len(), filtered = !search.is_empty(), "Exporting insights");

    transcoder::write_csv(&records)
}
