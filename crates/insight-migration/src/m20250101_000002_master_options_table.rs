use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MasterOptions::Table)
                    .if_not_exists()
                    .col(pk_auto(MasterOptions::Id))
                    .col(string_len(MasterOptions::CategoryKey, 50))
                    .col(string_len(MasterOptions::OptionValue, 100))
                    .col(string_len(MasterOptions::OptionLabel, 200))
                    .col(integer(MasterOptions::SortOrder).default(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_master_options_category")
                    .table(MasterOptions::Table)
                    .col(MasterOptions::CategoryKey)
                    .col(MasterOptions::SortOrder)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MasterOptions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum MasterOptions {
    Table,
    Id,
    CategoryKey,
    OptionValue,
    OptionLabel,
    SortOrder,
}
