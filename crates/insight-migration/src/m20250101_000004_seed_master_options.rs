use sea_orm_migration::prelude::*;

use crate::m20250101_000002_master_options_table::MasterOptions;

/// (category_key, option_value, option_label, sort_order)
const MASTER_OPTIONS: &[(&str, &str, &str, i32)] = &[
    // Insight display status
    ("status", "01_Waiting for Test", "01_テスト待ち", 1),
    ("status", "02_Testing", "02_テスト中", 2),
    ("status", "03_Waiting for Distribution", "03_配信待ち", 3),
    ("status", "04_Distributing", "04_配信中", 4),
    ("status", "05_Suspended", "05_停止中", 5),
    ("status", "06_Distribution Ended", "06_配信終了", 6),
    ("status", "07_Withdrawn", "07_取り下げ", 7),
    ("status", "08_Deleted", "08_削除", 8),
    // Insight type
    ("insight_type", "base", "base", 1),
    ("insight_type", "custom", "custom", 2),
    ("insight_type", "obb", "obb", 3),
    ("insight_type", "Other", "その他（備考欄に記入）", 4),
    // Main category
    ("main_category", "base", "base", 1),
    ("main_category", "obb", "obb", 2),
    ("main_category", "tips", "tips", 3),
    ("main_category", "notification", "notification", 4),
    ("main_category", "marketing", "marketing", 5),
    ("main_category", "event", "event", 6),
    ("main_category", "quiz", "quiz", 7),
    ("main_category", "game", "game", 8),
    ("main_category", "Other", "その他（備考欄に記入）", 9),
    // Data category
    ("data_category", "Financial Only", "金融データのみ", 1),
    ("data_category", "Non-Financial Only", "非金融データのみ", 2),
    ("data_category", "Financial/Non-Financial Data", "金融/非金融データ", 3),
    ("data_category", "No Data", "データなし", 4),
    // Financial data banks
    ("target_banks", "None", "なし", 1),
    ("target_banks", "Fukuoka", "福岡", 2),
    ("target_banks", "Juhachi-Shinwa", "十八親和", 3),
    ("target_banks", "Kumamoto", "熊本", 4),
    ("target_banks", "Awa", "阿波", 5),
    ("target_banks", "Okinawa", "沖縄", 6),
    ("target_banks", "Kitanippon", "北日本", 7),
    ("target_banks", "Saga", "佐賀", 8),
    ("target_banks", "Hachijuni-Nagano", "八十二長野", 9),
    ("target_banks", "Hiroshima", "広島", 10),
    ("target_banks", "Yamanashi Chuo", "山梨中央", 11),
    ("target_banks", "Shizuoka", "静岡", 12),
    ("target_banks", "Other", "その他（備考欄に記入）", 13),
    // Data tables
    ("target_tables", "Customers", "Customers", 1),
    ("target_tables", "CustomerAccountRelations", "CustomerAccountRelations", 2),
    ("target_tables", "Accounts", "Accounts", 3),
    ("target_tables", "Cards", "Cards", 4),
    ("target_tables", "Transactions", "Transactions", 5),
    ("target_tables", "ApplicationUsers", "ApplicationUsers", 6),
    ("target_tables", "ApplicationLogs", "ApplicationLogs", 7),
    ("target_tables", "GoalDeposit", "GoalDeposit", 8),
    ("target_tables", "MycoinHistories", "MycoinHistories", 9),
    ("target_tables", "NotificationInfo", "NotificationInfo", 10),
    // Revenue category
    ("revenue_category", "saving_accounts", "saving_accounts", 1),
    ("revenue_category", "cardloan_application", "cardloan_application", 2),
    ("revenue_category", "cardloan_borrowing", "cardloan_borrowing", 3),
    ("revenue_category", "theo_deposit", "theo_deposit", 4),
    ("revenue_category", "theo_application", "theo_application", 5),
    ("revenue_category", "provisioning", "provisioning", 6),
    ("revenue_category", "cotra", "cotra", 7),
    ("revenue_category", "vdebit_application", "vdebit_application", 8),
    ("revenue_category", "Other", "その他（備考欄に記入）", 9),
    // Icon type
    ("icon_type", "alert", "alert", 1),
    ("icon_type", "info", "info", 2),
    ("icon_type", "quiz", "quiz", 3),
    ("icon_type", "benefit", "benefit", 4),
    ("icon_type", "stat", "stat", 5),
    ("icon_type", "know", "know", 6),
    ("icon_type", "tx", "tx", 7),
    ("icon_type", "use", "use", 8),
    ("icon_type", "rec", "rec", 9),
    ("icon_type", "other", "other", 10),
    // Relevance policy
    ("relevance_policy", "Always_relevant", "Always_relevant", 1),
    ("relevance_policy", "Calender_period", "Calender_period", 2),
    ("relevance_policy", "Current_run", "Current_run", 3),
    ("relevance_policy", "Day_after_insight_presented", "Day_after_insight_presented", 4),
    ("relevance_policy", "Days_after_relevant_event", "Days_after_relevant_event", 5),
    ("relevance_policy", "other", "other", 6),
    // Next display policy
    ("next_policy", "Calender_period", "Calender_period", 1),
    ("next_policy", "Conditional_min_duration", "Conditional_min_duration", 2),
    ("next_policy", "Min_days_duration", "Min_days_duration", 3),
    ("next_policy", "Never", "Never", 4),
    ("next_policy", "No_limitation", "No_limitation", 5),
    ("next_policy", "other", "other", 6),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert()
            .into_table(MasterOptions::Table)
            .columns([
                MasterOptions::CategoryKey,
                MasterOptions::OptionValue,
                MasterOptions::OptionLabel,
                MasterOptions::SortOrder,
            ])
            .to_owned();

        for (category_key, value, label, sort_order) in MASTER_OPTIONS {
            insert
                .values([
                    (*category_key).into(),
                    (*value).into(),
                    (*label).into(),
                    (*sort_order).into(),
                ])
                .map_err(|e| DbErr::Custom(e.to_string()))?;
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(MasterOptions::Table)
            .to_owned();

        manager.exec_stmt(delete).await
    }
}
