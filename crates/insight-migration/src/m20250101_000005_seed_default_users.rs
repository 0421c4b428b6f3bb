use sea_orm_migration::prelude::*;

use crate::m20250101_000001_users_table::Users;

const BCRYPT_COST: u32 = 10;

/// (username, password, role). Rotate these passwords after first deployment.
const DEFAULT_USERS: &[(&str, &str, &str)] = &[
    ("admin", "admin123", "Admin"),
    ("manager", "manager123", "Manager"),
    ("viewer", "viewer123", "Viewer"),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert()
            .into_table(Users::Table)
            .columns([Users::Username, Users::PasswordHash, Users::Role])
            .to_owned();

        for (username, password, role) in DEFAULT_USERS {
            let password_hash =
                bcrypt::hash(password, BCRYPT_COST).map_err(|e| DbErr::Custom(e.to_string()))?;

            insert
                .values([(*username).into(), password_hash.into(), (*role).into()])
                .map_err(|e| DbErr::Custom(e.to_string()))?;
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let usernames = DEFAULT_USERS.iter().map(|(username, _, _)| *username);

        let delete = Query::delete()
            .from_table(Users::Table)
            .and_where(Expr::col(Users::Username).is_in(usernames))
            .to_owned();

        manager.exec_stmt(delete).await
    }
}
