//! Insight search query builder
//!
//! Translates an [`InsightSearch`] into a SeaORM [`Condition`]. Every value is
//! bound as a parameter. Blank fields impose no constraint.
//!
//! | Field                                                              | Match                               |
//! |--------------------------------------------------------------------|-------------------------------------|
//! | creationNumber                                                     | exact                               |
//! | subject, insightId, logicFormula, relatedInsight, subCategory      | case-insensitive substring          |
//! | status, type, mainCategory, dataCategory, maintenanceDate          | exact                               |
//! | targetBanks, targetTables                                          | stored list contains any requested  |

use chrono::NaiveDate;
use insight_common::InsightError;
use sea_orm::{
    ColumnTrait, Condition,
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
};

use crate::entity::insights;

const LIKE_ESCAPE: char = '\\';

/// Structured insight filter
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InsightSearch {
    pub creation_number: Option<i32>,
    pub subject: Option<String>,
    pub insight_id: Option<String>,
    pub status: Option<String>,
    pub insight_type: Option<String>,
    pub main_category: Option<String>,
    pub sub_category: Option<String>,
    pub data_category: Option<String>,
    pub logic_formula: Option<String>,
    pub related_insight: Option<String>,
    pub maintenance_date: Option<NaiveDate>,
    pub target_banks: Vec<String>,
    pub target_tables: Vec<String>,
}

impl InsightSearch {
    /// Build a search from decoded query-string pairs.
    ///
    /// Array fields accept repeated keys, with or without a `[]` suffix.
    /// Unknown keys are ignored. A non-numeric `creationNumber` or a
    /// `maintenanceDate` that is not `YYYY-MM-DD` is a validation error.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, InsightError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut search = InsightSearch::default();

        for (key, value) in pairs {
            let key = key.as_ref();
            let key = key.strip_suffix("[]").unwrap_or(key);
            let value = value.as_ref().trim();

            if value.is_empty() {
                continue;
            }

            match key {
                "creationNumber" => {
                    let number = value.parse::<i32>().map_err(|_| {
                        InsightError::validation(format!("invalid creationNumber: {}", value))
                    })?;
                    search.creation_number = Some(number);
                }
                "maintenanceDate" => {
                    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
                        InsightError::validation(format!("invalid maintenanceDate: {}", value))
                    })?;
                    search.maintenance_date = Some(date);
                }
                "subject" => search.subject = Some(value.to_string()),
                "insightId" => search.insight_id = Some(value.to_string()),
                "status" => search.status = Some(value.to_string()),
                "type" => search.insight_type = Some(value.to_string()),
                "mainCategory" => search.main_category = Some(value.to_string()),
                "subCategory" => search.sub_category = Some(value.to_string()),
                "dataCategory" => search.data_category = Some(value.to_string()),
                "logicFormula" => search.logic_formula = Some(value.to_string()),
                "relatedInsight" => search.related_insight = Some(value.to_string()),
                "targetBanks" => search.target_banks.push(value.to_string()),
                "targetTables" => search.target_tables.push(value.to_string()),
                _ => {}
            }
        }

        Ok(search)
    }

    pub fn is_empty(&self) -> bool {
        *self == InsightSearch::default()
    }

    /// Translate into a condition over the `insights` table
    pub fn to_condition(&self) -> Condition {
        let mut condition = Condition::all();

        if let Some(number) = self.creation_number {
            condition = condition.add(insights::Column::CreationNumber.eq(number));
        }

        let partial = [
            (insights::Column::Subject, &self.subject),
            (insights::Column::InsightId, &self.insight_id),
            (insights::Column::LogicFormula, &self.logic_formula),
            (insights::Column::RelatedInsight, &self.related_insight),
            (insights::Column::SubCategory, &self.sub_category),
        ];
        for (column, value) in partial {
            if let Some(v) = value {
                condition = condition.add(contains_ignore_case(column, v));
            }
        }

        let exact = [
            (insights::Column::Status, &self.status),
            (insights::Column::Type, &self.insight_type),
            (insights::Column::MainCategory, &self.main_category),
            (insights::Column::DataCategory, &self.data_category),
        ];
        for (column, value) in exact {
            if let Some(v) = value {
                condition = condition.add(column.eq(v.as_str()));
            }
        }

        if let Some(date) = self.maintenance_date {
            condition = condition.add(insights::Column::MaintenanceDate.eq(date));
        }

        if !self.target_banks.is_empty() {
            condition = condition.add(list_contains_any(
                insights::Column::TargetBanks,
                &self.target_banks,
            ));
        }
        if !self.target_tables.is_empty() {
            condition = condition.add(list_contains_any(
                insights::Column::TargetTables,
                &self.target_tables,
            ));
        }

        condition
    }
}

/// Escape LIKE wildcards so user input matches literally.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if c == LIKE_ESCAPE || c == '%' || c == '_' {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

fn contains_ignore_case(column: insights::Column, value: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&value.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

/// Stored lists are JSON arrays of strings, so an element matches when its
/// JSON encoding (quotes included) appears in the column text.
fn list_contains_any(column: insights::Column, values: &[String]) -> Condition {
    values.iter().fold(Condition::any(), |condition, value| {
        let needle = serde_json::to_string(value).unwrap_or_default();
        let pattern = format!("%{}%", escape_like(&needle));
        condition.add(Expr::col(column).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)))
    })
}
