use sea_orm_migration::{prelude::*, schema::*};

use super::m20240601_000001_create_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bike::Table)
                    .if_not_exists()
                    .col(pk_auto(Bike::Id))
                    .col(string_len(Bike::Brand, 50).not_null())
                    .col(string_len(Bike::Model, 50).not_null())
                    .col(integer(Bike::Year).not_null())
                    .col(string_len(Bike::Type, 32).not_null())
                    .col(string_len(Bike::City, 50).not_null())
                    .col(crate::money(manager, Bike::PricePerHour))
                    .col(crate::money(manager, Bike::PricePerDay))
                    .col(crate::money(manager, Bike::PricePerMonth))
                    .col(integer_null(Bike::OwnerId))
                    .col(string_len_null(Bike::Description, 500))
                    .col(string_len(Bike::Status, 32).not_null())
                    .col(string_len_null(Bike::ImageUrl, 500))
                    .col(boolean(Bike::IsActive).not_null().default(true))
                    .col(date_time(Bike::CreatedAt).not_null())
                    .col(date_time(Bike::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bike_owner")
                            .from(Bike::Table, Bike::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bike::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Bike {
    #[sea_orm(iden = "bikes")]
    Table,
    Id,
    Brand,
    Model,
    Year,
    Type,
    City,
    PricePerHour,
    PricePerDay,
    PricePerMonth,
    OwnerId,
    Description,
    Status,
    ImageUrl,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
