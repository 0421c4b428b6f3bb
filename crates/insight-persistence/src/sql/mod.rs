//! SQL-based persistence backend (MySQL/PostgreSQL/SQLite via SeaORM)
//!
//! This module implements the persistence traits with direct SeaORM queries.

use async_trait::async_trait;
use insight_common::InsightError;
use sea_orm::{prelude::Expr, *};

use crate::entity::{insights, master_options, users};
use crate::model::*;
use crate::query::InsightSearch;
use crate::traits::*;

/// External database persistence service
///
/// Wraps a SeaORM `DatabaseConnection` and implements all persistence traits.
pub struct ExternalDbPersistService {
    db: DatabaseConnection,
}

impl ExternalDbPersistService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

/// Map unique-key violations on `insight_id` to a conflict error
fn map_insight_write_error(err: DbErr, insight_id: Option<&str>) -> anyhow::Error {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return InsightError::Conflict(format!(
            "duplicate insightId: {}",
            insight_id.unwrap_or_default()
        ))
        .into();
    }
    err.into()
}

fn insight_active_model(data: &InsightData) -> insights::ActiveModel {
    insights::ActiveModel {
        creation_number: Set(data.creation_number),
        subject: Set(data.subject.clone()),
        insight_id: Set(data.insight_id.clone()),
        status: Set(data.status.clone()),
        start_date: Set(data.start_date),
        update_date: Set(data.update_date),
        end_date: Set(data.end_date),
        r#type: Set(data.insight_type.clone()),
        main_category: Set(data.main_category.clone()),
        sub_category: Set(data.sub_category.clone()),
        data_category: Set(data.data_category.clone()),
        target_banks: Set(Some(encode_list(&data.target_banks))),
        logic_formula: Set(data.logic_formula.clone()),
        target_tables: Set(Some(encode_list(&data.target_tables))),
        target_users: Set(data.target_users.clone()),
        related_insight: Set(data.related_insight.clone()),
        revenue_category: Set(data.revenue_category.clone()),
        icon_type: Set(data.icon_type.clone()),
        score: Set(data.score),
        relevance_policy: Set(data.relevance_policy.clone()),
        relevance_score: Set(data.relevance_score.clone()),
        display_count: Set(data.display_count),
        select_count: Set(data.select_count),
        next_policy: Set(data.next_policy.clone()),
        next_value: Set(data.next_value.clone()),
        app_link: Set(data.app_link.clone()),
        external_link: Set(data.external_link.clone()),
        teaser_image: Set(data.teaser_image.clone()),
        story_images: Set(Some(encode_list(&data.story_images))),
        maintenance_date: Set(data.maintenance_date),
        maintenance_reason: Set(data.maintenance_reason.clone()),
        remarks: Set(data.remarks.clone()),
        updated_by: Set(data.updated_by.clone()),
        ..Default::default()
    }
}

fn master_active_model(data: &MasterOptionData) -> master_options::ActiveModel {
    master_options::ActiveModel {
        category_key: Set(data.category_key.clone()),
        option_value: Set(data.option_value.clone()),
        option_label: Set(data.option_label.clone()),
        sort_order: Set(data.sort_order),
        ..Default::default()
    }
}

// ============================================================================
// PersistenceService implementation
// ============================================================================

#[async_trait]
impl PersistenceService for ExternalDbPersistService {
    async fn health_check(&self) -> anyhow::Result<()> {
        users::Entity::find()
            .select_only()
            .column_as(Expr::cust("1"), "health")
            .into_tuple::<i32>()
            .one(&self.db)
            .await?;
        Ok(())
    }
}

// ============================================================================
// InsightPersistence implementation
// ============================================================================

#[async_trait]
impl InsightPersistence for ExternalDbPersistService {
    async fn insight_find_by_id(&self, id: i32) -> anyhow::Result<Option<Insight>> {
        Ok(insights::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Insight::from))
    }

    async fn insight_find_by_insight_id(
        &self,
        insight_id: &str,
    ) -> anyhow::Result<Option<Insight>> {
        Ok(insights::Entity::find()
            .filter(insights::Column::InsightId.eq(insight_id))
            .one(&self.db)
            .await?
            .map(Insight::from))
    }

    async fn insight_search(&self, search: &InsightSearch) -> anyhow::Result<Vec<Insight>> {
        let items = insights::Entity::find()
            .filter(search.to_condition())
            .order_by_asc(insights::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Insight::from)
            .collect();

        Ok(items)
    }

    async fn insight_create(&self, data: &InsightData) -> anyhow::Result<Insight> {
        let timestamp = now();
        let mut entity = insight_active_model(data);
        entity.created_at = Set(timestamp);
        entity.updated_at = Set(timestamp);

        let model = entity
            .insert(&self.db)
            .await
            .map_err(|e| map_insight_write_error(e, data.insight_id.as_deref()))?;

        tracing::debug!(id = model.id, "Insight created");

        Ok(model.into())
    }

    async fn insight_update(&self, id: i32, data: &InsightData) -> anyhow::Result<Option<Insight>> {
        let mut entity = insight_active_model(data);
        entity.id = Unchanged(id);
        entity.updated_at = Set(now());

        match entity.update(&self.db).await {
            Ok(model) => Ok(Some(model.into())),
            Err(DbErr::RecordNotUpdated) | Err(DbErr::RecordNotFound(_)) => Ok(None),
            Err(e) => Err(map_insight_write_error(e, data.insight_id.as_deref())),
        }
    }

    async fn insight_delete(&self, id: i32) -> anyhow::Result<bool> {
        let result = insights::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn insight_exists_insight_id(
        &self,
        insight_id: &str,
        exclude_id: Option<i32>,
    ) -> anyhow::Result<bool> {
        let mut select = insights::Entity::find().filter(insights::Column::InsightId.eq(insight_id));

        if let Some(id) = exclude_id {
            select = select.filter(insights::Column::Id.ne(id));
        }

        Ok(select.count(&self.db).await? > 0)
    }
}

// ============================================================================
// MasterPersistence implementation
// ============================================================================

#[async_trait]
impl MasterPersistence for ExternalDbPersistService {
    async fn master_find_all(&self) -> anyhow::Result<Vec<MasterOption>> {
        let items = master_options::Entity::find()
            .order_by_asc(master_options::Column::CategoryKey)
            .order_by_asc(master_options::Column::SortOrder)
            .order_by_asc(master_options::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(MasterOption::from)
            .collect();

        Ok(items)
    }

    async fn master_find_by_category(
        &self,
        category_key: &str,
    ) -> anyhow::Result<Vec<MasterOption>> {
        let items = master_options::Entity::find()
            .filter(master_options::Column::CategoryKey.eq(category_key))
            .order_by_asc(master_options::Column::SortOrder)
            .order_by_asc(master_options::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(MasterOption::from)
            .collect();

        Ok(items)
    }

    async fn master_find_by_id(&self, id: i32) -> anyhow::Result<Option<MasterOption>> {
        Ok(master_options::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(MasterOption::from))
    }

    async fn master_create(&self, data: &MasterOptionData) -> anyhow::Result<MasterOption> {
        let model = master_active_model(data).insert(&self.db).await?;
        Ok(model.into())
    }

    async fn master_update(
        &self,
        id: i32,
        data: &MasterOptionData,
    ) -> anyhow::Result<Option<MasterOption>> {
        let mut entity = master_active_model(data);
        entity.id = Unchanged(id);

        match entity.update(&self.db).await {
            Ok(model) => Ok(Some(model.into())),
            Err(DbErr::RecordNotUpdated) | Err(DbErr::RecordNotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn master_delete(&self, id: i32) -> anyhow::Result<bool> {
        let result = master_options::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}

// ============================================================================
// AuthPersistence implementation
// ============================================================================

#[async_trait]
impl AuthPersistence for ExternalDbPersistService {
    async fn user_find_by_username(&self, username: &str) -> anyhow::Result<Option<UserInfo>> {
        Ok(users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await?
            .map(UserInfo::from))
    }

    async fn user_find_by_id(&self, id: i32) -> anyhow::Result<Option<UserInfo>> {
        Ok(users::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(UserInfo::from))
    }

    async fn user_create(
        &self,
        username: &str,
        password_hash: &str,
        role: &str,
    ) -> anyhow::Result<UserInfo> {
        let entity = users::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            role: Set(role.to_string()),
            created_at: Set(now()),
            ..Default::default()
        };

        let model = entity.insert(&self.db).await?;
        Ok(model.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    async fn setup() -> ExternalDbPersistService {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        ExternalDbPersistService::new(db)
    }

    fn sample(creation_number: i32, insight_id: &str) -> InsightData {
        InsightData {
            creation_number,
            subject: Some(format!("Subject {}", creation_number)),
            insight_id: Some(insight_id.to_string()),
            status: Some("01_Waiting for Test".to_string()),
            insight_type: Some("base".to_string()),
            target_banks: vec!["Fukuoka".to_string(), "Saga".to_string()],
            target_tables: vec!["Cards".to_string()],
            score: Some(Decimal::from_str("12.5").unwrap()),
            display_count: Some(1),
            select_count: Some(1),
            maintenance_date: Some(default_maintenance_date()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insight_create_and_find() {
        let store = setup().await;

        let created = store.insight_create(&sample(1, "INS-001")).await.unwrap();
        assert!(created.id > 0);

        let found = store.insight_find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.data, created.data);
        assert_eq!(found.data.target_banks, vec!["Fukuoka", "Saga"]);
        assert_eq!(found.data.score, Some(Decimal::from_str("12.50").unwrap()));

        let by_insight_id = store
            .insight_find_by_insight_id("INS-001")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_insight_id.id, created.id);
    }

    #[tokio::test]
    async fn test_insight_duplicate_insight_id_is_conflict() {
        let store = setup().await;
        store.insight_create(&sample(1, "DUP")).await.unwrap();

        let err = store.insight_create(&sample(2, "DUP")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InsightError>(),
            Some(InsightError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_insight_search_filters() {
        let store = setup().await;
        store.insight_create(&sample(1, "A-1")).await.unwrap();
        let mut other = sample(2, "B-2");
        other.target_banks = vec!["Kumamoto".to_string()];
        other.subject = Some("Monthly 100% cashback".to_string());
        store.insight_create(&other).await.unwrap();

        let all = store.insight_search(&InsightSearch::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].id < all[1].id);

        let search = InsightSearch {
            target_banks: vec!["Saga".to_string(), "Other".to_string()],
            ..Default::default()
        };
        let found = store.insight_search(&search).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].data.insight_id.as_deref(), Some("A-1"));

        let search = InsightSearch {
            subject: Some("100%".to_string()),
            ..Default::default()
        };
        let found = store.insight_search(&search).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].data.insight_id.as_deref(), Some("B-2"));

        let search = InsightSearch {
            subject: Some("SUBJECT".to_string()),
            ..Default::default()
        };
        assert_eq!(store.insight_search(&search).await.unwrap().len(), 1);

        let search = InsightSearch {
            creation_number: Some(2),
            insight_type: Some("base".to_string()),
            ..Default::default()
        };
        assert_eq!(store.insight_search(&search).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insight_update_and_delete() {
        let store = setup().await;
        let created = store.insight_create(&sample(1, "U-1")).await.unwrap();

        let mut changed = created.data.clone();
        changed.subject = Some("Changed".to_string());
        changed.target_banks.clear();

        let updated = store
            .insight_update(created.id, &changed)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.data.subject.as_deref(), Some("Changed"));
        assert!(updated.data.target_banks.is_empty());
        assert!(updated.updated_at >= created.updated_at);

        assert!(store.insight_update(9999, &changed).await.unwrap().is_none());

        assert!(store.insight_delete(created.id).await.unwrap());
        assert!(!store.insight_delete(created.id).await.unwrap());
        assert!(store.insight_find_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insight_exists_insight_id() {
        let store = setup().await;
        let created = store.insight_create(&sample(1, "E-1")).await.unwrap();

        assert!(store.insight_exists_insight_id("E-1", None).await.unwrap());
        assert!(
            !store
                .insight_exists_insight_id("E-1", Some(created.id))
                .await
                .unwrap()
        );
        assert!(!store.insight_exists_insight_id("E-2", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_master_options_seeded_and_ordered() {
        let store = setup().await;

        let statuses = store.master_find_by_category("status").await.unwrap();
        assert_eq!(statuses.len(), 8);
        assert_eq!(statuses[0].option_value, "01_Waiting for Test");
        assert!(statuses.windows(2).all(|w| w[0].sort_order <= w[1].sort_order));

        let all = store.master_find_all().await.unwrap();
        assert!(all.windows(2).all(|w| w[0].category_key <= w[1].category_key));
    }

    #[tokio::test]
    async fn test_master_option_crud() {
        let store = setup().await;

        let data = MasterOptionData {
            category_key: "icon_type".to_string(),
            option_value: "star".to_string(),
            option_label: "Star".to_string(),
            sort_order: 11,
        };
        let created = store.master_create(&data).await.unwrap();
        assert_eq!(created.option_value, "star");

        let mut changed = data.clone();
        changed.option_label = "Starred".to_string();
        let updated = store
            .master_update(created.id, &changed)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.option_label, "Starred");
        assert!(store.master_update(99999, &changed).await.unwrap().is_none());

        assert!(store.master_delete(created.id).await.unwrap());
        assert!(store.master_find_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_users_seeded() {
        let store = setup().await;

        let admin = store.user_find_by_username("admin").await.unwrap().unwrap();
        assert_eq!(admin.role, "Admin");
        assert!(bcrypt_like(&admin.password_hash));

        let by_id = store.user_find_by_id(admin.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "admin");

        assert!(store.user_find_by_username("nobody").await.unwrap().is_none());
        store.health_check().await.unwrap();
    }

    fn bcrypt_like(hash: &str) -> bool {
        hash.starts_with("$2")
    }
}
