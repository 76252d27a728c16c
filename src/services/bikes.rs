use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};
use serde::Deserialize;
use validator::Validate;

use crate::entities::bike::{self, BikeStatus, BikeType};
use crate::entities::user;
use crate::error::{AppError, AppResult};
use crate::utils::money::validate_price;
use crate::utils::validation::not_blank;

/// Number of listings returned as "popular". Picked in id order, not by demand.
pub const POPULAR_LIMIT: u64 = 3;

pub type BikeWithOwner = (bike::Model, Option<user::Model>);

/// Listing body for create and full update.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BikeInput {
    #[validate(
        custom(function = "not_blank", message = "brand is required"),
        length(max = 50, message = "brand must be at most 50 characters")
    )]
    pub brand: String,
    #[validate(
        custom(function = "not_blank", message = "model is required"),
        length(max = 50, message = "model must be at most 50 characters")
    )]
    pub model: String,
    pub year: i32,
    #[serde(rename = "type")]
    pub bike_type: BikeType,
    #[validate(
        custom(function = "not_blank", message = "city is required"),
        length(max = 50, message = "city must be at most 50 characters")
    )]
    pub city: String,
    #[validate(custom(
        function = "validate_price",
        message = "pricePerHour must be greater than 0 and at most 99999999.99"
    ))]
    pub price_per_hour: Decimal,
    #[validate(custom(
        function = "validate_price",
        message = "pricePerDay must be greater than 0 and at most 99999999.99"
    ))]
    pub price_per_day: Decimal,
    #[validate(custom(
        function = "validate_price",
        message = "pricePerMonth must be greater than 0 and at most 99999999.99"
    ))]
    pub price_per_month: Decimal,
    pub owner_id: Option<i32>,
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,
    pub status: Option<BikeStatus>,
    #[validate(length(max = 500, message = "imageUrl must be at most 500 characters"))]
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

/// Optional criteria for `/filter`; an absent field matches everything.
#[derive(Debug, Clone, Default)]
pub struct BikeFilter {
    pub city: Option<String>,
    pub bike_type: Option<BikeType>,
    pub brand: Option<String>,
    pub status: Option<BikeStatus>,
}

impl BikeFilter {
    fn condition(&self) -> Condition {
        Condition::all()
            .add(bike::Column::IsActive.eq(true))
            .add_option(self.city.as_deref().map(|c| bike::Column::City.eq(c)))
            .add_option(self.bike_type.map(|t| bike::Column::BikeType.eq(t)))
            .add_option(self.brand.as_deref().map(|b| bike::Column::Brand.eq(b)))
            .add_option(self.status.map(|s| bike::Column::Status.eq(s)))
    }
}

async fn fetch<C>(db: &C, select: Select<bike::Entity>) -> AppResult<Vec<BikeWithOwner>>
where
    C: ConnectionTrait,
{
    Ok(select
        .order_by_asc(bike::Column::Id)
        .find_also_related(user::Entity)
        .all(db)
        .await?)
}

async fn ensure_owner_exists<C>(db: &C, owner_id: i32) -> AppResult<()>
where
    C: ConnectionTrait,
{
    user::Entity::find_by_id(owner_id)
        .one(db)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::BadRequest("Owner not found".to_string()))
}

pub async fn create<C>(db: &C, input: BikeInput) -> AppResult<bike::Model>
where
    C: ConnectionTrait,
{
    input.validate()?;

    let status = input.status.unwrap_or(BikeStatus::Available);
    if !BikeStatus::Available.can_set_manually(status, false) {
        return Err(AppError::BadRequest(
            "A new bike cannot start out booked".to_string(),
        ));
    }

    if let Some(owner_id) = input.owner_id {
        ensure_owner_exists(db, owner_id).await?;
    }

    let new_bike = bike::ActiveModel {
        brand: Set(input.brand.trim().to_string()),
        model: Set(input.model.trim().to_string()),
        year: Set(input.year),
        bike_type: Set(input.bike_type),
        city: Set(input.city.trim().to_string()),
        price_per_hour: Set(input.price_per_hour),
        price_per_day: Set(input.price_per_day),
        price_per_month: Set(input.price_per_month),
        owner_id: Set(input.owner_id),
        description: Set(input.description),
        status: Set(status),
        image_url: Set(input.image_url),
        is_active: Set(input.is_active.unwrap_or(true)),
        ..Default::default()
    };

    let bike = new_bike.insert(db).await?;
    tracing::info!(bike_id = bike.id, owner_id = ?bike.owner_id, "Bike listed");
    Ok(bike)
}

pub async fn find_by_id<C>(db: &C, id: i32) -> AppResult<bike::Model>
where
    C: ConnectionTrait,
{
    bike::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Bike not found".to_string()))
}

pub async fn find_with_owner<C>(db: &C, id: i32) -> AppResult<BikeWithOwner>
where
    C: ConnectionTrait,
{
    bike::Entity::find_by_id(id)
        .find_also_related(user::Entity)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Bike not found".to_string()))
}

/// Replace the descriptive, pricing and status fields of a listing.
///
/// The owner is only reassigned when `input.owner_id` is present; callers
/// decide whether the actor may do that.
pub async fn update<C>(db: &C, id: i32, input: BikeInput, by_admin: bool) -> AppResult<bike::Model>
where
    C: ConnectionTrait,
{
    input.validate()?;
    let bike = find_by_id(db, id).await?;
    let current_status = bike.status;

    let mut active: bike::ActiveModel = bike.into();
    active.brand = Set(input.brand.trim().to_string());
    active.model = Set(input.model.trim().to_string());
    active.year = Set(input.year);
    active.bike_type = Set(input.bike_type);
    active.city = Set(input.city.trim().to_string());
    active.price_per_hour = Set(input.price_per_hour);
    active.price_per_day = Set(input.price_per_day);
    active.price_per_month = Set(input.price_per_month);
    active.description = Set(input.description);
    active.image_url = Set(input.image_url);

    if let Some(next) = input.status {
        if !current_status.can_set_manually(next, by_admin) {
            return Err(AppError::BadRequest(format!(
                "Cannot change bike status from {} to {}",
                current_status.label(),
                next.label()
            )));
        }
        active.status = Set(next);
    }

    if let Some(is_active) = input.is_active {
        active.is_active = Set(is_active);
    }

    if let Some(owner_id) = input.owner_id {
        ensure_owner_exists(db, owner_id).await?;
        active.owner_id = Set(Some(owner_id));
    }

    Ok(active.update(db).await?)
}

pub async fn delete<C>(db: &C, id: i32) -> AppResult<()>
where
    C: ConnectionTrait,
{
    let result = bike::Entity::delete_by_id(id).exec(db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Bike not found".to_string()));
    }

    tracing::info!(bike_id = id, "Bike deleted");
    Ok(())
}

pub async fn list_active<C>(db: &C) -> AppResult<Vec<BikeWithOwner>>
where
    C: ConnectionTrait,
{
    fetch(db, bike::Entity::find().filter(bike::Column::IsActive.eq(true))).await
}

pub async fn list_available<C>(db: &C) -> AppResult<Vec<BikeWithOwner>>
where
    C: ConnectionTrait,
{
    fetch(
        db,
        bike::Entity::find()
            .filter(bike::Column::IsActive.eq(true))
            .filter(bike::Column::Status.eq(BikeStatus::Available)),
    )
    .await
}

pub async fn list_popular<C>(db: &C) -> AppResult<Vec<BikeWithOwner>>
where
    C: ConnectionTrait,
{
    fetch(
        db,
        bike::Entity::find()
            .filter(bike::Column::IsActive.eq(true))
            .filter(bike::Column::Status.eq(BikeStatus::Available))
            .limit(POPULAR_LIMIT),
    )
    .await
}

pub async fn list_by_status<C>(db: &C, status: BikeStatus) -> AppResult<Vec<BikeWithOwner>>
where
    C: ConnectionTrait,
{
    fetch(db, bike::Entity::find().filter(bike::Column::Status.eq(status))).await
}

pub async fn list_by_type<C>(db: &C, bike_type: BikeType) -> AppResult<Vec<BikeWithOwner>>
where
    C: ConnectionTrait,
{
    fetch(db, bike::Entity::find().filter(bike::Column::BikeType.eq(bike_type))).await
}

pub async fn list_by_city<C>(db: &C, city: &str) -> AppResult<Vec<BikeWithOwner>>
where
    C: ConnectionTrait,
{
    fetch(db, bike::Entity::find().filter(bike::Column::City.eq(city))).await
}

pub async fn list_by_brand<C>(db: &C, brand: &str) -> AppResult<Vec<BikeWithOwner>>
where
    C: ConnectionTrait,
{
    fetch(db, bike::Entity::find().filter(bike::Column::Brand.eq(brand))).await
}

pub async fn list_by_owner<C>(db: &C, owner_id: i32) -> AppResult<Vec<BikeWithOwner>>
where
    C: ConnectionTrait,
{
    fetch(db, bike::Entity::find().filter(bike::Column::OwnerId.eq(owner_id))).await
}

/// Active bikes owned by `owner_id`, without the owner join.
pub async fn list_active_owned<C>(db: &C, owner_id: i32) -> AppResult<Vec<bike::Model>>
where
    C: ConnectionTrait,
{
    Ok(bike::Entity::find()
        .filter(bike::Column::OwnerId.eq(owner_id))
        .filter(bike::Column::IsActive.eq(true))
        .order_by_asc(bike::Column::Id)
        .all(db)
        .await?)
}

pub async fn filter<C>(db: &C, criteria: &BikeFilter) -> AppResult<Vec<BikeWithOwner>>
where
    C: ConnectionTrait,
{
    fetch(db, bike::Entity::find().filter(criteria.condition())).await
}
