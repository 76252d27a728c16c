use sea_orm_migration::{prelude::*, schema::*};

use super::m20240601_000001_create_users::User;
use super::m20240601_000002_create_bikes::Bike;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(pk_auto(Booking::Id))
                    .col(integer(Booking::UserId).not_null())
                    .col(integer(Booking::BikeId).not_null())
                    .col(date_time(Booking::PickupDate).not_null())
                    .col(date_time(Booking::DropoffDate).not_null())
                    .col(string_len(Booking::PickupTime, 16).not_null())
                    .col(string_len(Booking::DropTime, 16).not_null())
                    .col(date_time_null(Booking::ActualPickupDate))
                    .col(date_time_null(Booking::ActualDropoffDate))
                    .col(crate::money(manager, Booking::TotalPrice))
                    .col(string_len(Booking::Status, 32).not_null())
                    .col(string_len_null(Booking::Notes, 500))
                    .col(date_time(Booking::CreatedAt).not_null())
                    .col(date_time(Booking::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_user")
                            .from(Booking::Table, Booking::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_bike")
                            .from(Booking::Table, Booking::BikeId)
                            .to(Bike::Table, Bike::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Booking {
    #[sea_orm(iden = "bookings")]
    Table,
    Id,
    UserId,
    BikeId,
    PickupDate,
    DropoffDate,
    PickupTime,
    DropTime,
    ActualPickupDate,
    ActualDropoffDate,
    TotalPrice,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
}
