//! Master option service

use insight_common::InsightError;
use insight_persistence::{MasterOption, MasterOptionData, PersistenceService};

use crate::lookup::MasterCategory;
use crate::validation::validate_master_option;

fn not_found(id: i32) -> anyhow::Error {
    InsightError::not_found(format!("master option {}", id)).into()
}

/// All options, or the options of one category when `category_key` is set
pub async fn list<P>(persistence: &P, category_key: Option<&str>) -> anyhow::Result<Vec<MasterOption>>
where
    P: PersistenceService + ?Sized,
{
    match insight_common::non_blank(category_key) {
        Some(key) => {
            let category = key.parse::<MasterCategory>()?;
            persistence.master_find_by_category(category.as_str()).await
        }
        None => persistence.master_find_all().await,
    }
}

pub async fn create<P>(persistence: &P, data: MasterOptionData) -> anyhow::Result<MasterOption>
where
    P: PersistenceService + ?Sized,
{
    let data = validate_master_option(data)?;
    let created = persistence.master_create(&data).await?;

    tracing::info!(
        id = created.id,
        category_key = %created.category_key,
        option_value = %created.option_value,
        "Master option created"
    );

    Ok(created)
}

pub async fn update<P>(
    persistence: &P,
    id: i32,
    data: MasterOptionData,
) -> anyhow::Result<MasterOption>
where
    P: PersistenceService + ?Sized,
{
    let data = validate_master_option(data)?;
    let updated = persistence
        .master_update(id, &data)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(id, "Master option updated");

    Ok(updated)
}

pub async fn delete<P>(persistence: &P, id: i32) -> anyhow::Result<()>
where
    P: PersistenceService + ?Sized,
{
    if !persistence.master_delete(id).await? {
        return Err(not_found(id));
    }

    tracing::info!(id, "Master option deleted");

    Ok(())
}
