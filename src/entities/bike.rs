use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::utils::{datetime, money};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BikeType {
    #[sea_orm(string_value = "SPORT")]
    Sport,
    #[sea_orm(string_value = "CRUISER")]
    Cruiser,
    #[sea_orm(string_value = "TOURING")]
    Touring,
    #[sea_orm(string_value = "STANDARD")]
    Standard,
    #[sea_orm(string_value = "SCOOTER")]
    Scooter,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BikeStatus {
    #[sea_orm(string_value = "AVAILABLE")]
    Available,
    #[sea_orm(string_value = "BOOKED")]
    Booked,
    #[sea_orm(string_value = "MAINTENANCE")]
    Maintenance,
    #[sea_orm(string_value = "OUT_OF_SERVICE")]
    OutOfService,
}

impl BikeStatus {
    pub const ALL: [BikeStatus; 4] = [
        BikeStatus::Available,
        BikeStatus::Booked,
        BikeStatus::Maintenance,
        BikeStatus::OutOfService,
    ];

    /// Whether a listing update may move a bike from `self` to `next`.
    ///
    /// BOOKED is owned by the booking lifecycle: it can never be written by
    /// hand, and only an admin may pull a bike out of it.
    pub fn can_set_manually(self, next: BikeStatus, by_admin: bool) -> bool {
        if self == next {
            return true;
        }
        match (self, next) {
            (_, BikeStatus::Booked) => false,
            (BikeStatus::Booked, _) => by_admin,
            _ => true,
        }
    }

    /// Lowercase status name, e.g. `out_of_service`.
    pub fn label(self) -> String {
        self.to_value().to_lowercase()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bikes")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub brand: String,
    pub model: String,
    pub year: i32,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub bike_type: BikeType,
    pub city: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    #[serde(serialize_with = "money::serialize")]
    pub price_per_hour: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    #[serde(serialize_with = "money::serialize")]
    pub price_per_day: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    #[serde(serialize_with = "money::serialize")]
    pub price_per_month: Decimal,
    pub owner_id: Option<i32>,
    pub description: Option<String>,
    pub status: BikeStatus,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = datetime::now();
        if insert && self.created_at.is_not_set() {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}
