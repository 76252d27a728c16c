use sea_orm_migration::prelude::*;

use super::m20240601_000002_create_bikes::Bike;
use super::m20240601_000003_create_bookings::Booking;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Browsing filters by city and status
        manager
            .create_index(
                Index::create()
                    .name("idx_bikes_city_status")
                    .table(Bike::Table)
                    .col(Bike::City)
                    .col(Bike::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bikes_owner")
                    .table(Bike::Table)
                    .col(Bike::OwnerId)
                    .to_owned(),
            )
            .await?;

        // Conflict lookups are per bike and status
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_bike_status")
                    .table(Booking::Table)
                    .col(Booking::BikeId)
                    .col(Booking::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_user")
                    .table(Booking::Table)
                    .col(Booking::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_bookings_user").table(Booking::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_bookings_bike_status")
                    .table(Booking::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_bikes_owner").table(Bike::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_bikes_city_status").table(Bike::Table).to_owned())
            .await
    }
}
