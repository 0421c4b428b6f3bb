//! Lookup table over master options
//!
//! Master options map a stored code to a display label within a category.
//! Categories form a closed set; options are admin-editable.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use insight_common::InsightError;
use insight_persistence::{MasterOption, MasterPersistence};

/// Master option category key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MasterCategory {
    Status,
    InsightType,
    MainCategory,
    DataCategory,
    TargetBanks,
    TargetTables,
    RevenueCategory,
    IconType,
    RelevancePolicy,
    NextPolicy,
}

impl MasterCategory {
    pub const ALL: [MasterCategory; 10] = [
        MasterCategory::Status,
        MasterCategory::InsightType,
        MasterCategory::MainCategory,
        MasterCategory::DataCategory,
        MasterCategory::TargetBanks,
        MasterCategory::TargetTables,
        MasterCategory::RevenueCategory,
        MasterCategory::IconType,
        MasterCategory::RelevancePolicy,
        MasterCategory::NextPolicy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MasterCategory::Status => "status",
            MasterCategory::InsightType => "insight_type",
            MasterCategory::MainCategory => "main_category",
            MasterCategory::DataCategory => "data_category",
            MasterCategory::TargetBanks => "target_banks",
            MasterCategory::TargetTables => "target_tables",
            MasterCategory::RevenueCategory => "revenue_category",
            MasterCategory::IconType => "icon_type",
            MasterCategory::RelevancePolicy => "relevance_policy",
            MasterCategory::NextPolicy => "next_policy",
        }
    }

    /// Whether insights hold a list of this category's values
    pub fn is_list(self) -> bool {
        matches!(self, MasterCategory::TargetBanks | MasterCategory::TargetTables)
    }
}

impl Display for MasterCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MasterCategory {
    type Err = InsightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MasterCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| InsightError::validation(format!("unknown categoryKey: {}", s)))
    }
}

/// In-memory view of the master options, grouped by category
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    options: HashMap<MasterCategory, Vec<MasterOption>>,
}

impl LookupTable {
    /// Group options by category. Within a category options are ordered by
    /// sort order, ties keep their input order. Unknown categories are dropped.
    pub fn from_options(options: Vec<MasterOption>) -> Self {
        let mut grouped: HashMap<MasterCategory, Vec<MasterOption>> = HashMap::new();

        for option in options {
            match option.category_key.parse::<MasterCategory>() {
                Ok(category) => grouped.entry(category).or_default().push(option),
                Err(_) => {
                    tracing::debug!(
                        category_key = %option.category_key,
                        "Ignoring master option with unknown category"
                    );
                }
            }
        }

        for list in grouped.values_mut() {
            list.sort_by_key(|o| o.sort_order);
        }

        Self { options: grouped }
    }

    /// Load every master option from the store
    pub async fn load<P>(persistence: &P) -> anyhow::Result<Self>
    where
        P: MasterPersistence + ?Sized,
    {
        Ok(Self::from_options(persistence.master_find_all().await?))
    }

    pub fn options(&self, category: MasterCategory) -> &[MasterOption] {
        self.options
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, category: MasterCategory, value: &str) -> bool {
        self.find(category, value).is_some()
    }

    /// Display label for `value`. Falls back to the value itself.
    pub fn label<'a>(&'a self, category: MasterCategory, value: &'a str) -> &'a str {
        self.find(category, value)
            .map(|o| o.option_label.as_str())
            .unwrap_or(value)
    }

    fn find(&self, category: MasterCategory, value: &str) -> Option<&MasterOption> {
        self.options(category)
            .iter()
            .find(|o| o.option_value == value)
    }
}
