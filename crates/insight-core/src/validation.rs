//! Input validation for insight records and master options
//!
//! Insight validation normalizes the payload (blank strings become `None`,
//! blank list entries are dropped, the maintenance date gets its default)
//! and rejects the first invalid field with a row-level reason string.

use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::ValidationError;

use insight_common::InsightError;
use insight_persistence::model::default_maintenance_date;
use insight_persistence::{InsightData, MasterOptionData};

use crate::lookup::{LookupTable, MasterCategory};

pub const MIN_CREATION_NUMBER: i32 = 1;
pub const MAX_CREATION_NUMBER: i32 = 19999;
pub const MIN_COUNT: i32 = 1;
pub const MAX_COUNT: i32 = 99;
pub const MAX_STORY_IMAGES: usize = 3;
/// Separates list elements in a CSV cell, so no element may contain it
pub const LIST_DELIMITER: char = ';';
/// Exclusive bound of a decimal(5,2) score
pub const MAX_SCORE_ABS: i64 = 1000;
pub const MAX_SCORE_SCALE: u32 = 2;

pub const MAX_CATEGORY_KEY_LENGTH: usize = 50;
pub const MAX_OPTION_VALUE_LENGTH: usize = 100;
pub const MAX_OPTION_LABEL_LENGTH: usize = 200;

/// Column length limits of the insights table
const TEXT_LIMITS: [(&str, usize); 13] = [
    ("subject", 500),
    ("insightId", 100),
    ("subCategory", 100),
    ("relatedInsight", 200),
    ("relevanceScore", 100),
    ("nextValue", 200),
    ("appLink", 500),
    ("externalLink", 500),
    ("teaserImage", 500),
    ("maintenanceReason", 50),
    ("remarks", 200),
    ("updatedBy", 100),
    ("storyImages", 500),
];

fn into_insight_error(error: ValidationError) -> InsightError {
    InsightError::Validation(
        error
            .message
            .map(Cow::into_owned)
            .unwrap_or_else(|| error.code.into_owned()),
    )
}

/// Validate that `value` is at most `max` characters
pub fn validate_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::new("too_long")
            .with_message(Cow::Owned(format!("{} too long (max {})", field, max))));
    }
    Ok(())
}

fn text_limit(field: &str) -> usize {
    TEXT_LIMITS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, max)| *max)
        .unwrap_or(usize::MAX)
}

fn out_of_range(field: &str) -> InsightError {
    InsightError::validation(format!("{} out of range", field))
}

fn normalize_text(value: &mut Option<String>) {
    if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
        *value = None;
    }
}

/// Trim a coded value and drop it when blank
fn normalize_code(value: &mut Option<String>) {
    *value = insight_common::non_blank(value.as_deref()).map(str::to_string);
}

fn normalize_list(values: &mut Vec<String>) {
    *values = values
        .iter()
        .filter_map(|v| insight_common::non_blank(Some(v.as_str())))
        .map(str::to_string)
        .collect();
}

fn check_range(field: &str, value: Option<i32>, min: i32, max: i32) -> Result<(), InsightError> {
    match value {
        Some(v) if !(min..=max).contains(&v) => Err(out_of_range(field)),
        _ => Ok(()),
    }
}

fn check_list_element(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.contains(LIST_DELIMITER) {
        return Err(ValidationError::new("list_delimiter").with_message(Cow::Owned(format!(
            "{} must not contain '{}': {}",
            field, LIST_DELIMITER, value
        ))));
    }
    Ok(())
}

fn check_score(score: Option<Decimal>) -> Result<(), InsightError> {
    if let Some(score) = score {
        if score.abs() >= Decimal::from(MAX_SCORE_ABS) {
            return Err(out_of_range("score"));
        }
        if score.normalize().scale() > MAX_SCORE_SCALE {
            return Err(InsightError::validation(format!("invalid score: {}", score)));
        }
    }
    Ok(())
}

fn check_code(
    lookup: &LookupTable,
    field: &str,
    category: MasterCategory,
    value: Option<&str>,
) -> Result<(), InsightError> {
    match value {
        Some(v) if !lookup.contains(category, v) => Err(InsightError::validation(format!(
            "unrecognized {} value: {}",
            field, v
        ))),
        _ => Ok(()),
    }
}

/// Normalize and validate an insight payload against the lookup table.
///
/// Returns the normalized payload, or a `Validation` error whose message is
/// the reason reported for an import row.
pub fn validate_insight(
    mut data: InsightData,
    lookup: &LookupTable,
) -> Result<InsightData, InsightError> {
    for value in [
        &mut data.subject,
        &mut data.sub_category,
        &mut data.logic_formula,
        &mut data.target_users,
        &mut data.related_insight,
        &mut data.relevance_score,
        &mut data.next_value,
        &mut data.app_link,
        &mut data.external_link,
        &mut data.teaser_image,
        &mut data.maintenance_reason,
        &mut data.remarks,
        &mut data.updated_by,
    ] {
        normalize_text(value);
    }
    for value in [
        &mut data.insight_id,
        &mut data.status,
        &mut data.insight_type,
        &mut data.main_category,
        &mut data.data_category,
        &mut data.revenue_category,
        &mut data.icon_type,
        &mut data.relevance_policy,
        &mut data.next_policy,
    ] {
        normalize_code(value);
    }
    normalize_list(&mut data.target_banks);
    normalize_list(&mut data.target_tables);
    normalize_list(&mut data.story_images);

    if data.maintenance_date.is_none() {
        data.maintenance_date = Some(default_maintenance_date());
    }

    check_range(
        "creationNumber",
        Some(data.creation_number),
        MIN_CREATION_NUMBER,
        MAX_CREATION_NUMBER,
    )?;
    check_range("displayCount", data.display_count, MIN_COUNT, MAX_COUNT)?;
    check_range("selectCount", data.select_count, MIN_COUNT, MAX_COUNT)?;
    check_score(data.score)?;

    if data.story_images.len() > MAX_STORY_IMAGES {
        return Err(out_of_range("storyImages"));
    }

    let texts = [
        ("subject", &data.subject),
        ("insightId", &data.insight_id),
        ("subCategory", &data.sub_category),
        ("relatedInsight", &data.related_insight),
        ("relevanceScore", &data.relevance_score),
        ("nextValue", &data.next_value),
        ("appLink", &data.app_link),
        ("externalLink", &data.external_link),
        ("teaserImage", &data.teaser_image),
        ("maintenanceReason", &data.maintenance_reason),
        ("remarks", &data.remarks),
        ("updatedBy", &data.updated_by),
    ];
    for (field, value) in texts {
        if let Some(v) = value {
            validate_length(field, v, text_limit(field)).map_err(into_insight_error)?;
        }
    }
    for image in &data.story_images {
        validate_length("storyImages", image, text_limit("storyImages"))
            .map_err(into_insight_error)?;
    }

    let lists = [
        ("targetBanks", &data.target_banks),
        ("targetTables", &data.target_tables),
        ("storyImages", &data.story_images),
    ];
    for (field, values) in lists {
        for value in values {
            check_list_element(field, value).map_err(into_insight_error)?;
        }
    }

    let codes = [
        ("status", MasterCategory::Status, &data.status),
        ("type", MasterCategory::InsightType, &data.insight_type),
        ("mainCategory", MasterCategory::MainCategory, &data.main_category),
        ("dataCategory", MasterCategory::DataCategory, &data.data_category),
        ("revenueCategory", MasterCategory::RevenueCategory, &data.revenue_category),
        ("iconType", MasterCategory::IconType, &data.icon_type),
        ("relevancePolicy", MasterCategory::RelevancePolicy, &data.relevance_policy),
        ("nextPolicy", MasterCategory::NextPolicy, &data.next_policy),
    ];
    for (field, category, value) in codes {
        check_code(lookup, field, category, value.as_deref())?;
    }
    for bank in &data.target_banks {
        check_code(lookup, "targetBanks", MasterCategory::TargetBanks, Some(bank))?;
    }
    for table in &data.target_tables {
        check_code(lookup, "targetTables", MasterCategory::TargetTables, Some(table))?;
    }

    Ok(data)
}

pub fn validate_category_key(category_key: &str) -> Result<(), ValidationError> {
    if category_key.parse::<MasterCategory>().is_err() {
        return Err(ValidationError::new("category_key_unknown")
            .with_message(Cow::Owned(format!("unknown categoryKey: {}", category_key))));
    }
    Ok(())
}

pub fn validate_option_value(option_value: &str) -> Result<(), ValidationError> {
    if option_value.trim().is_empty() {
        return Err(ValidationError::new("option_value_empty")
            .with_message(Cow::Borrowed("missing required field: optionValue")));
    }
    validate_length("optionValue", option_value, MAX_OPTION_VALUE_LENGTH)
}

pub fn validate_option_label(option_label: &str) -> Result<(), ValidationError> {
    if option_label.trim().is_empty() {
        return Err(ValidationError::new("option_label_empty")
            .with_message(Cow::Borrowed("missing required field: optionLabel")));
    }
    validate_length("optionLabel", option_label, MAX_OPTION_LABEL_LENGTH)
}

/// Trim and validate a master option payload
pub fn validate_master_option(mut data: MasterOptionData) -> Result<MasterOptionData, InsightError> {
    data.category_key = data.category_key.trim().to_string();
    data.option_value = data.option_value.trim().to_string();
    data.option_label = data.option_label.trim().to_string();

    validate_category_key(&data.category_key).map_err(into_insight_error)?;
    validate_length("categoryKey", &data.category_key, MAX_CATEGORY_KEY_LENGTH)
        .map_err(into_insight_error)?;
    validate_option_value(&data.option_value).map_err(into_insight_error)?;
    if matches!(data.category_key.parse::<MasterCategory>(), Ok(c) if c.is_list()) {
        check_list_element("optionValue", &data.option_value).map_err(into_insight_error)?;
    }
    validate_option_label(&data.option_label).map_err(into_insight_error)?;

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use insight_persistence::MasterOption;
    use std::str::FromStr;

    fn lookup() -> LookupTable {
        let options = [
            ("status", "04_Distributing"),
            ("insight_type", "base"),
            ("main_category", "tips"),
            ("data_category", "No Data"),
            ("target_banks", "Fukuoka"),
            ("target_banks", "Saga"),
            ("target_tables", "Cards"),
            ("icon_type", "info"),
        ];
        LookupTable::from_options(
            options
                .iter()
                .enumerate()
                .map(|(i, (category, value))| MasterOption {
                    id: i as i32 + 1,
                    category_key: category.to_string(),
                    option_value: value.to_string(),
                    option_label: value.to_string(),
                    sort_order: 1,
                })
                .collect(),
        )
    }

    fn valid() -> InsightData {
        InsightData {
            creation_number: 100,
            subject: Some("Savings tip".to_string()),
            insight_id: Some(" INS-100 ".to_string()),
            status: Some("04_Distributing".to_string()),
            insight_type: Some("base".to_string()),
            target_banks: vec!["Fukuoka".to_string(), " ".to_string()],
            target_tables: vec!["Cards".to_string()],
            score: Some(Decimal::from_str("12.5").unwrap()),
            display_count: Some(1),
            select_count: Some(99),
            ..Default::default()
        }
    }

    fn reason(data: InsightData) -> String {
        validate_insight(data, &lookup()).unwrap_err().to_string()
    }

    #[test]
    fn test_valid_insight_is_normalized() {
        let mut data = valid();
        data.remarks = Some("   ".to_string());
        data.story_images = vec!["".to_string(), "/uploads/a.png".to_string()];

        let normalized = validate_insight(data, &lookup()).unwrap();
        assert_eq!(normalized.insight_id.as_deref(), Some("INS-100"));
        assert_eq!(normalized.target_banks, vec!["Fukuoka"]);
        assert_eq!(normalized.story_images, vec!["/uploads/a.png"]);
        assert!(normalized.remarks.is_none());
        assert_eq!(
            normalized.maintenance_date,
            NaiveDate::from_ymd_opt(2099, 12, 31)
        );
    }

    #[test]
    fn test_blank_insight_id_becomes_none() {
        let mut data = valid();
        data.insight_id = Some("".to_string());
        let normalized = validate_insight(data, &lookup()).unwrap();
        assert!(normalized.insight_id.is_none());
    }

    #[test]
    fn test_creation_number_bounds() {
        for ok in [1, 19999] {
            let mut data = valid();
            data.creation_number = ok;
            assert!(validate_insight(data, &lookup()).is_ok());
        }
        for bad in [0, -1, 20000, 99999] {
            let mut data = valid();
            data.creation_number = bad;
            assert_eq!(reason(data), "creationNumber out of range");
        }
    }

    #[test]
    fn test_counts_bounds() {
        let mut data = valid();
        data.display_count = Some(0);
        assert_eq!(reason(data), "displayCount out of range");

        let mut data = valid();
        data.select_count = Some(100);
        assert_eq!(reason(data), "selectCount out of range");
    }

    #[test]
    fn test_score_precision_and_range() {
        let mut data = valid();
        data.score = Some(Decimal::from_str("999.99").unwrap());
        assert!(validate_insight(data, &lookup()).is_ok());

        let mut data = valid();
        data.score = Some(Decimal::from_str("12.500").unwrap());
        assert!(validate_insight(data, &lookup()).is_ok());

        let mut data = valid();
        data.score = Some(Decimal::from_str("1000").unwrap());
        assert_eq!(reason(data), "score out of range");

        let mut data = valid();
        data.score = Some(Decimal::from_str("1.234").unwrap());
        assert_eq!(reason(data), "invalid score: 1.234");
    }

    #[test]
    fn test_story_images_limit() {
        let mut data = valid();
        data.story_images = (0..4).map(|i| format!("/uploads/{}.png", i)).collect();
        assert_eq!(reason(data), "storyImages out of range");
    }

    #[test]
    fn test_unrecognized_codes() {
        let mut data = valid();
        data.status = Some("99_Unknown".to_string());
        assert_eq!(reason(data), "unrecognized status value: 99_Unknown");

        let mut data = valid();
        data.target_banks = vec!["Fukuoka".to_string(), "Atlantis".to_string()];
        assert_eq!(reason(data), "unrecognized targetBanks value: Atlantis");

        let mut data = valid();
        data.insight_type = Some("Base".to_string());
        assert_eq!(reason(data), "unrecognized type value: Base");
    }

    #[test]
    fn test_text_length_limit() {
        let mut data = valid();
        data.maintenance_reason = Some("x".repeat(51));
        assert_eq!(reason(data), "maintenanceReason too long (max 50)");

        let mut data = valid();
        data.maintenance_reason = Some("あ".repeat(50));
        assert!(validate_insight(data, &lookup()).is_ok());
    }

    #[test]
    fn test_list_elements_reject_delimiter() {
        let mut data = valid();
        data.story_images = vec!["https://cdn.example.com/a.png;v=2".to_string()];
        assert_eq!(
            reason(data),
            "storyImages must not contain ';': https://cdn.example.com/a.png;v=2"
        );

        let mut data = valid();
        data.target_tables = vec!["Cards;Accounts".to_string()];
        assert_eq!(
            reason(data),
            "targetTables must not contain ';': Cards;Accounts"
        );
    }

    #[test]
    fn test_list_option_values_reject_delimiter() {
        for category in ["target_banks", "target_tables"] {
            let err = validate_master_option(MasterOptionData {
                category_key: category.to_string(),
                option_value: "Fukuoka;Saga".to_string(),
                option_label: "Both".to_string(),
                sort_order: 0,
            })
            .unwrap_err();
            assert_eq!(
                err.to_string(),
                "optionValue must not contain ';': Fukuoka;Saga"
            );
        }

        let status = validate_master_option(MasterOptionData {
            category_key: "status".to_string(),
            option_value: "05;Paused".to_string(),
            option_label: "Paused".to_string(),
            sort_order: 0,
        });
        assert!(status.is_ok());
    }

    #[test]
    fn test_validate_master_option() {
        let data = MasterOptionData {
            category_key: " icon_type ".to_string(),
            option_value: "star".to_string(),
            option_label: "Star".to_string(),
            sort_order: 3,
        };
        let normalized = validate_master_option(data).unwrap();
        assert_eq!(normalized.category_key, "icon_type");

        let err = validate_master_option(MasterOptionData {
            category_key: "colour".to_string(),
            option_value: "red".to_string(),
            option_label: "Red".to_string(),
            sort_order: 0,
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "unknown categoryKey: colour");

        let err = validate_master_option(MasterOptionData {
            category_key: "status".to_string(),
            option_value: " ".to_string(),
            option_label: "Blank".to_string(),
            sort_order: 0,
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "missing required field: optionValue");
    }
}
