pub use sea_orm_migration::prelude::*;

mod m20250101_000001_users_table;
mod m20250101_000002_master_options_table;
mod m20250101_000003_insights_table;
mod m20250101_000004_seed_master_options;
mod m20250101_000005_seed_default_users;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_users_table::Migration),
            Box::new(m20250101_000002_master_options_table::Migration),
            Box::new(m20250101_000003_insights_table::Migration),
            Box::new(m20250101_000004_seed_master_options::Migration),
            Box::new(m20250101_000005_seed_default_users::Migration),
        ]
    }
}
