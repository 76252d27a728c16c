use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(pk_auto(User::Id))
                    .col(string_len(User::Name, 100).not_null())
                    .col(string_len(User::Email, 255).not_null().unique_key())
                    .col(string_len_null(User::Phone, 20))
                    .col(string_len(User::Password, 255).not_null())
                    .col(string_len(User::Role, 32).not_null())
                    .col(string_len_null(User::Address, 255))
                    .col(boolean(User::IsActive).not_null().default(true))
                    .col(date_time(User::CreatedAt).not_null())
                    .col(date_time(User::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum User {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Name,
    Email,
    Phone,
    Password,
    Role,
    Address,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
