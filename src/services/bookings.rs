//! The booking engine.
//!
//! Two behaviours are kept as they have always been and are known gaps:
//! create and update never consult [`find_conflicts`], and cancelling always
//! returns the bike to AVAILABLE even when it has other open bookings.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::bike::{self, BikeStatus};
use crate::entities::booking::{self, BookingStatus};
use crate::entities::user;
use crate::error::{AppError, AppResult};
use crate::services::pricing;
use crate::utils::datetime;

/// Statuses that block a bike for the conflict query.
pub const BLOCKING_STATUSES: [BookingStatus; 2] = [BookingStatus::Confirmed, BookingStatus::Active];

#[derive(Debug, Clone, Validate)]
pub struct NewBooking {
    pub user_id: i32,
    pub bike_id: i32,
    pub pickup_date: NaiveDateTime,
    pub dropoff_date: NaiveDateTime,
    #[validate(length(max = 16, message = "pickupTime must be at most 16 characters"))]
    pub pickup_time: String,
    #[validate(length(max = 16, message = "dropTime must be at most 16 characters"))]
    pub drop_time: String,
    #[validate(length(max = 500, message = "notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Validate)]
pub struct BookingChanges {
    pub pickup_date: NaiveDateTime,
    pub dropoff_date: NaiveDateTime,
    #[validate(length(max = 16, message = "pickupTime must be at most 16 characters"))]
    pub pickup_time: String,
    #[validate(length(max = 16, message = "dropTime must be at most 16 characters"))]
    pub drop_time: String,
    #[validate(length(max = 500, message = "notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

/// Claim an AVAILABLE bike and record a PENDING booking for it.
///
/// Both writes share one transaction. The bike is flipped with a guarded
/// update so two concurrent requests cannot both claim it.
pub async fn create(db: &DatabaseConnection, input: NewBooking) -> AppResult<booking::Model> {
    input.validate()?;
    let txn = db.begin().await?;

    user::Entity::find_by_id(input.user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::BadRequest("User not found".to_string()))?;

    let bike = bike::Entity::find_by_id(input.bike_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::BadRequest("Bike not found".to_string()))?;

    if bike.status != BikeStatus::Available {
        return Err(AppError::Conflict(format!(
            "Bike is currently {}",
            bike.status.label()
        )));
    }

    let total_price = pricing::total_price(bike.price_per_hour, input.pickup_date, input.dropoff_date)?;

    let claimed = bike::Entity::update_many()
        .set(bike::ActiveModel {
            status: Set(BikeStatus::Booked),
            updated_at: Set(datetime::now()),
            ..Default::default()
        })
        .filter(bike::Column::Id.eq(bike.id))
        .filter(bike::Column::Status.eq(BikeStatus::Available))
        .exec(&txn)
        .await?;

    if claimed.rows_affected == 0 {
        return Err(AppError::Conflict(
            "Bike was booked by another request".to_string(),
        ));
    }

    let booking = booking::ActiveModel {
        user_id: Set(input.user_id),
        bike_id: Set(bike.id),
        pickup_date: Set(input.pickup_date),
        dropoff_date: Set(input.dropoff_date),
        pickup_time: Set(input.pickup_time),
        drop_time: Set(input.drop_time),
        actual_pickup_date: Set(None),
        actual_dropoff_date: Set(None),
        total_price: Set(total_price),
        status: Set(BookingStatus::Pending),
        notes: Set(input.notes),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(
        booking_id = booking.id,
        bike_id = booking.bike_id,
        user_id = booking.user_id,
        total_price = %booking.total_price,
        "Booking created"
    );
    Ok(booking)
}

pub async fn find_by_id<C>(db: &C, id: i32) -> AppResult<booking::Model>
where
    C: ConnectionTrait,
{
    booking::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
}

/// Move the window and re-price it from the bike's current hourly rate.
/// Availability is not re-checked.
pub async fn update<C>(db: &C, id: i32, changes: BookingChanges) -> AppResult<booking::Model>
where
    C: ConnectionTrait,
{
    changes.validate()?;
    let booking = find_by_id(db, id).await?;

    if booking.status.is_terminal() {
        return Err(AppError::BadRequest(format!(
            "Cannot modify a {} booking",
            booking.status.to_value().to_lowercase()
        )));
    }

    let bike = bike::Entity::find_by_id(booking.bike_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Bike {} missing for booking {}", booking.bike_id, id)))?;

    let mut active: booking::ActiveModel = booking.into();
    active.total_price = Set(pricing::total_price(
        bike.price_per_hour,
        changes.pickup_date,
        changes.dropoff_date,
    )?);
    active.pickup_date = Set(changes.pickup_date);
    active.dropoff_date = Set(changes.dropoff_date);
    active.pickup_time = Set(changes.pickup_time);
    active.drop_time = Set(changes.drop_time);
    if changes.notes.is_some() {
        active.notes = Set(changes.notes);
    }

    Ok(active.update(db).await?)
}

async fn release_bike<C>(db: &C, bike_id: i32) -> AppResult<()>
where
    C: ConnectionTrait,
{
    bike::Entity::update_many()
        .set(bike::ActiveModel {
            status: Set(BikeStatus::Available),
            updated_at: Set(datetime::now()),
            ..Default::default()
        })
        .filter(bike::Column::Id.eq(bike_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Cancel a booking and free its bike unconditionally.
pub async fn cancel(db: &DatabaseConnection, id: i32) -> AppResult<booking::Model> {
    let txn = db.begin().await?;
    let booking = find_by_id(&txn, id).await?;

    if !booking.status.can_transition_to(BookingStatus::Cancelled) {
        return Err(AppError::BadRequest(format!(
            "Booking is already {}",
            booking.status.to_value().to_lowercase()
        )));
    }

    let bike_id = booking.bike_id;
    let mut active: booking::ActiveModel = booking.into();
    active.status = Set(BookingStatus::Cancelled);
    let cancelled = active.update(&txn).await?;

    let still_open = booking::Entity::find()
        .filter(booking::Column::BikeId.eq(bike_id))
        .filter(booking::Column::Id.ne(id))
        .filter(booking::Column::Status.is_in([
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Active,
        ]))
        .count(&txn)
        .await?;

    release_bike(&txn, bike_id).await?;
    txn.commit().await?;

    if still_open > 0 {
        tracing::warn!(
            booking_id = id,
            bike_id,
            open_bookings = still_open,
            "Bike released while other bookings are still open"
        );
    }
    tracing::info!(booking_id = id, bike_id, "Booking cancelled");
    Ok(cancelled)
}

/// Advance along PENDING -> CONFIRMED -> ACTIVE -> COMPLETED.
///
/// Starting stamps the actual pickup, completing stamps the actual dropoff
/// and returns the bike to AVAILABLE.
pub async fn advance(
    db: &DatabaseConnection,
    id: i32,
    next: BookingStatus,
) -> AppResult<booking::Model> {
    if next == BookingStatus::Cancelled {
        return cancel(db, id).await;
    }

    let txn = db.begin().await?;
    let booking = find_by_id(&txn, id).await?;

    if !booking.status.can_transition_to(next) {
        return Err(AppError::BadRequest(format!(
            "Cannot move booking from {} to {}",
            booking.status.to_value(),
            next.to_value()
        )));
    }

    let bike_id = booking.bike_id;
    let mut active: booking::ActiveModel = booking.into();
    active.status = Set(next);
    match next {
        BookingStatus::Active => active.actual_pickup_date = Set(Some(datetime::now())),
        BookingStatus::Completed => active.actual_dropoff_date = Set(Some(datetime::now())),
        _ => {}
    }
    let updated = active.update(&txn).await?;

    if next == BookingStatus::Completed {
        release_bike(&txn, bike_id).await?;
    }

    txn.commit().await?;
    tracing::info!(booking_id = id, status = ?next, "Booking status changed");
    Ok(updated)
}

pub async fn list_all<C>(db: &C) -> AppResult<Vec<booking::Model>>
where
    C: ConnectionTrait,
{
    Ok(booking::Entity::find()
        .order_by_asc(booking::Column::Id)
        .all(db)
        .await?)
}

pub async fn list_by_user<C>(db: &C, user_id: i32) -> AppResult<Vec<booking::Model>>
where
    C: ConnectionTrait,
{
    Ok(booking::Entity::find()
        .filter(booking::Column::UserId.eq(user_id))
        .order_by_asc(booking::Column::Id)
        .all(db)
        .await?)
}

pub async fn list_by_bike<C>(db: &C, bike_id: i32) -> AppResult<Vec<booking::Model>>
where
    C: ConnectionTrait,
{
    Ok(booking::Entity::find()
        .filter(booking::Column::BikeId.eq(bike_id))
        .order_by_asc(booking::Column::Id)
        .all(db)
        .await?)
}

pub async fn list_by_status<C>(db: &C, status: BookingStatus) -> AppResult<Vec<booking::Model>>
where
    C: ConnectionTrait,
{
    Ok(booking::Entity::find()
        .filter(booking::Column::Status.eq(status))
        .order_by_asc(booking::Column::Id)
        .all(db)
        .await?)
}

/// Bookings whose planned pickup falls inside `[start, end]`.
pub async fn list_by_pickup_range<C>(
    db: &C,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> AppResult<Vec<booking::Model>>
where
    C: ConnectionTrait,
{
    Ok(booking::Entity::find()
        .filter(booking::Column::PickupDate.between(start, end))
        .order_by_asc(booking::Column::PickupDate)
        .all(db)
        .await?)
}

/// CONFIRMED or ACTIVE bookings on `bike_id` whose planned or actual interval
/// touches `[start, end]`.
pub async fn find_conflicts<C>(
    db: &C,
    bike_id: i32,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> AppResult<Vec<booking::Model>>
where
    C: ConnectionTrait,
{
    let overlaps = Condition::any()
        .add(
            Condition::all()
                .add(booking::Column::PickupDate.lte(end))
                .add(booking::Column::DropoffDate.gte(start)),
        )
        .add(
            Condition::all()
                .add(booking::Column::ActualPickupDate.lte(end))
                .add(booking::Column::ActualDropoffDate.gte(start)),
        );

    Ok(booking::Entity::find()
        .filter(booking::Column::BikeId.eq(bike_id))
        .filter(overlaps)
        .filter(booking::Column::Status.is_in(BLOCKING_STATUSES))
        .order_by_asc(booking::Column::PickupDate)
        .all(db)
        .await?)
}

/// A booking with the renter and bike it points at.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: booking::Model,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub bike_brand: Option<String>,
    pub bike_model: Option<String>,
    pub bike_city: Option<String>,
}

/// Resolve user and bike references for a batch of bookings in two queries.
pub async fn with_details<C>(
    db: &C,
    bookings: Vec<booking::Model>,
) -> AppResult<Vec<BookingDetails>>
where
    C: ConnectionTrait,
{
    let user_ids: HashSet<i32> = bookings.iter().map(|b| b.user_id).collect();
    let bike_ids: HashSet<i32> = bookings.iter().map(|b| b.bike_id).collect();

    let users: HashMap<i32, user::Model> = user::Entity::find()
        .filter(user::Column::Id.is_in(user_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let bikes: HashMap<i32, bike::Model> = bike::Entity::find()
        .filter(bike::Column::Id.is_in(bike_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|b| (b.id, b))
        .collect();

    Ok(bookings
        .into_iter()
        .map(|b| {
            let user = users.get(&b.user_id);
            let bike = bikes.get(&b.bike_id);
            BookingDetails {
                user_name: user.map(|u| u.name.clone()),
                user_email: user.map(|u| u.email.clone()),
                bike_brand: bike.map(|k| k.brand.clone()),
                bike_model: bike.map(|k| k.model.clone()),
                bike_city: bike.map(|k| k.city.clone()),
                booking: b,
            }
        })
        .collect())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    #[serde(deserialize_with = "datetime::deserialize")]
    pub start_date: NaiveDateTime,
    #[serde(deserialize_with = "datetime::deserialize")]
    pub end_date: NaiveDateTime,
}

impl DateWindow {
    pub fn validate(&self) -> AppResult<()> {
        if self.end_date < self.start_date {
            return Err(AppError::BadRequest(
                "endDate must not be before startDate".to_string(),
            ));
        }
        Ok(())
    }
}
