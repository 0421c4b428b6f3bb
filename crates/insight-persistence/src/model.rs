//! Domain model types for persistence operations
//!
//! These types are storage-agnostic representations of the data returned by
//! and passed to the persistence traits.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};

use crate::entity::{insights, master_options, users};

/// Default maintenance date. A far future date means the insight is still active.
pub const DEFAULT_MAINTENANCE_DATE: (i32, u32, u32) = (2099, 12, 31);

pub fn default_maintenance_date() -> NaiveDate {
    let (y, m, d) = DEFAULT_MAINTENANCE_DATE;
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MAX)
}

/// Treat `null`, missing, and blank strings as `None`.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => T::deserialize(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Editable fields of an insight record.
///
/// Used as the create/update payload and as the parsed form of a CSV row.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightData {
    pub creation_number: i32,
    pub subject: Option<String>,
    pub insight_id: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub update_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub insight_type: Option<String>,
    pub main_category: Option<String>,
    pub sub_category: Option<String>,
    pub data_category: Option<String>,
    #[serde(default)]
    pub target_banks: Vec<String>,
    pub logic_formula: Option<String>,
    #[serde(default)]
    pub target_tables: Vec<String>,
    pub target_users: Option<String>,
    pub related_insight: Option<String>,
    pub revenue_category: Option<String>,
    pub icon_type: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub score: Option<Decimal>,
    pub relevance_policy: Option<String>,
    pub relevance_score: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub display_count: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub select_count: Option<i32>,
    pub next_policy: Option<String>,
    pub next_value: Option<String>,
    pub app_link: Option<String>,
    pub external_link: Option<String>,
    pub teaser_image: Option<String>,
    #[serde(default)]
    pub story_images: Vec<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub maintenance_date: Option<NaiveDate>,
    pub maintenance_reason: Option<String>,
    pub remarks: Option<String>,
    pub updated_by: Option<String>,
}

/// A stored insight record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: i32,
    #[serde(flatten)]
    pub data: InsightData,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Decode a JSON array column. Malformed or missing values read as empty.
pub(crate) fn decode_list(value: Option<&str>) -> Vec<String> {
    value
        .and_then(|v| serde_json::from_str::<Vec<String>>(v).ok())
        .unwrap_or_default()
}

pub(crate) fn encode_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

impl From<insights::Model> for Insight {
    fn from(value: insights::Model) -> Self {
        Self {
            id: value.id,
            data: InsightData {
                creation_number: value.creation_number,
                subject: value.subject,
                insight_id: value.insight_id,
                status: value.status,
                start_date: value.start_date,
                update_date: value.update_date,
                end_date: value.end_date,
                insight_type: value.r#type,
                main_category: value.main_category,
                sub_category: value.sub_category,
                data_category: value.data_category,
                target_banks: decode_list(value.target_banks.as_deref()),
                logic_formula: value.logic_formula,
                target_tables: decode_list(value.target_tables.as_deref()),
                target_users: value.target_users,
                related_insight: value.related_insight,
                revenue_category: value.revenue_category,
                icon_type: value.icon_type,
                score: value.score,
                relevance_policy: value.relevance_policy,
                relevance_score: value.relevance_score,
                display_count: value.display_count,
                select_count: value.select_count,
                next_policy: value.next_policy,
                next_value: value.next_value,
                app_link: value.app_link,
                external_link: value.external_link,
                teaser_image: value.teaser_image,
                story_images: decode_list(value.story_images.as_deref()),
                maintenance_date: value.maintenance_date,
                maintenance_reason: value.maintenance_reason,
                remarks: value.remarks,
                updated_by: value.updated_by,
            },
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Editable fields of a master option
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterOptionData {
    pub category_key: String,
    pub option_value: String,
    pub option_label: String,
    #[serde(default)]
    pub sort_order: i32,
}

/// A stored master option
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterOption {
    pub id: i32,
    pub category_key: String,
    pub option_value: String,
    pub option_label: String,
    pub sort_order: i32,
}

impl From<master_options::Model> for MasterOption {
    fn from(value: master_options::Model) -> Self {
        Self {
            id: value.id,
            category_key: value.category_key,
            option_value: value.option_value,
            option_label: value.option_label,
            sort_order: value.sort_order,
        }
    }
}

/// User information for auth operations
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
}

impl From<users::Model> for UserInfo {
    fn from(value: users::Model) -> Self {
        Self {
            id: value.id,
            username: value.username,
            password_hash: value.password_hash,
            role: value.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_data_deserialize_blank_values() {
        let data: InsightData = serde_json::from_value(serde_json::json!({
            "creationNumber": 12,
            "type": "base",
            "startDate": "",
            "score": "",
            "displayCount": null,
            "maintenanceDate": "2030-01-31",
        }))
        .unwrap();

        assert_eq!(data.creation_number, 12);
        assert_eq!(data.insight_type.as_deref(), Some("base"));
        assert!(data.start_date.is_none());
        assert!(data.score.is_none());
        assert!(data.display_count.is_none());
        assert!(data.target_banks.is_empty());
        assert_eq!(data.maintenance_date, NaiveDate::from_ymd_opt(2030, 1, 31));
    }

    #[test]
    fn test_insight_data_score_accepts_number_and_string() {
        let from_number: InsightData =
            serde_json::from_value(serde_json::json!({"creationNumber": 1, "score": 12.5}))
                .unwrap();
        let from_string: InsightData =
            serde_json::from_value(serde_json::json!({"creationNumber": 1, "score": "12.50"}))
                .unwrap();
        assert_eq!(from_number.score, from_string.score);
    }

    #[test]
    fn test_insight_data_requires_creation_number() {
        let result = serde_json::from_value::<InsightData>(serde_json::json!({"subject": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_list_codec() {
        let values = vec!["Fukuoka".to_string(), "Saga \"x\"".to_string()];
        let encoded = encode_list(&values);
        assert_eq!(decode_list(Some(&encoded)), values);
        assert!(decode_list(None).is_empty());
        assert!(decode_list(Some("not json")).is_empty());
    }

    #[test]
    fn test_user_info_hides_password_hash() {
        let user = UserInfo {
            id: 1,
            username: "admin".to_string(),
            password_hash: "$2b$10$secret".to_string(),
            role: "Admin".to_string(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "Admin");
    }

    #[test]
    fn test_default_maintenance_date() {
        assert_eq!(
            default_maintenance_date(),
            NaiveDate::from_ymd_opt(2099, 12, 31).unwrap()
        );
    }
}
