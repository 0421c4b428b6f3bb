//! Insight record entity
//!
//! List-valued fields (`target_banks`, `target_tables`, `story_images`) are
//! stored as JSON array text so that every backend can hold them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "insights")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub creation_number: i32,
    #[sea_orm(nullable)]
    pub subject: Option<String>,
    #[sea_orm(unique, nullable)]
    pub insight_id: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<Date>,
    pub update_date: Option<Date>,
    pub end_date: Option<Date>,
    pub r#type: Option<String>,
    pub main_category: Option<String>,
    pub sub_category: Option<String>,
    pub data_category: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub target_banks: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub logic_formula: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub target_tables: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub target_users: Option<String>,
    pub related_insight: Option<String>,
    pub revenue_category: Option<String>,
    pub icon_type: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))", nullable)]
    pub score: Option<Decimal>,
    pub relevance_policy: Option<String>,
    pub relevance_score: Option<String>,
    pub display_count: Option<i32>,
    pub select_count: Option<i32>,
    pub next_policy: Option<String>,
    pub next_value: Option<String>,
    pub app_link: Option<String>,
    pub external_link: Option<String>,
    pub teaser_image: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub story_images: Option<String>,
    pub maintenance_date: Option<Date>,
    pub maintenance_reason: Option<String>,
    pub remarks: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
