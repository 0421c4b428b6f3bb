use sea_orm_migration::{prelude::*, schema::*};

/// Coded columns hold master option values, which are at most this long
const CODE_LENGTH: u32 = 100;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(insights_table()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_insights_creation_number")
                    .table(Insights::Table)
                    .col(Insights::CreationNumber)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Insights::Table).to_owned())
            .await
    }
}

fn insights_table() -> TableCreateStatement {
    Table::create()
        .table(Insights::Table)
        .if_not_exists()
        .col(pk_auto(Insights::Id))
        .col(integer(Insights::CreationNumber))
        .col(string_len_null(Insights::Subject, 500))
        .col(string_len_null(Insights::InsightId, 100).unique_key())
        .col(string_len_null(Insights::Status, CODE_LENGTH))
        .col(date_null(Insights::StartDate))
        .col(date_null(Insights::UpdateDate))
        .col(date_null(Insights::EndDate))
        .col(string_len_null(Insights::Type, CODE_LENGTH))
        .col(string_len_null(Insights::MainCategory, CODE_LENGTH))
        .col(string_len_null(Insights::SubCategory, 100))
        .col(string_len_null(Insights::DataCategory, CODE_LENGTH))
        .col(text_null(Insights::TargetBanks))
        .col(text_null(Insights::LogicFormula))
        .col(text_null(Insights::TargetTables))
        .col(text_null(Insights::TargetUsers))
        .col(string_len_null(Insights::RelatedInsight, 200))
        .col(string_len_null(Insights::RevenueCategory, CODE_LENGTH))
        .col(string_len_null(Insights::IconType, CODE_LENGTH))
        .col(decimal_len_null(Insights::Score, 5, 2))
        .col(string_len_null(Insights::RelevancePolicy, CODE_LENGTH))
        .col(string_len_null(Insights::RelevanceScore, 100))
        .col(integer_null(Insights::DisplayCount).default(1))
        .col(integer_null(Insights::SelectCount).default(1))
        .col(string_len_null(Insights::NextPolicy, CODE_LENGTH))
        .col(string_len_null(Insights::NextValue, 200))
        .col(string_len_null(Insights::AppLink, 500))
        .col(string_len_null(Insights::ExternalLink, 500))
        .col(string_len_null(Insights::TeaserImage, 500))
        .col(text_null(Insights::StoryImages))
        .col(date_null(Insights::MaintenanceDate).default("2099-12-31"))
        .col(string_len_null(Insights::MaintenanceReason, 50))
        .col(string_len_null(Insights::Remarks, 200))
        .col(string_len_null(Insights::UpdatedBy, 100))
        .col(date_time(Insights::CreatedAt).default(Expr::current_timestamp()))
        .col(date_time(Insights::UpdatedAt).default(Expr::current_timestamp()))
        .to_owned()
}

#[derive(DeriveIden)]
enum Insights {
    Table,
    Id,
    CreationNumber,
    Subject,
    InsightId,
    Status,
    StartDate,
    UpdateDate,
    EndDate,
    Type,
    MainCategory,
    SubCategory,
    DataCategory,
    TargetBanks,
    LogicFormula,
    TargetTables,
    TargetUsers,
    RelatedInsight,
    RevenueCategory,
    IconType,
    Score,
    RelevancePolicy,
    RelevanceScore,
    DisplayCount,
    SelectCount,
    NextPolicy,
    NextValue,
    AppLink,
    ExternalLink,
    TeaserImage,
    StoryImages,
    MaintenanceDate,
    MaintenanceReason,
    Remarks,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}
