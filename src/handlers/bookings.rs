use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::entities::booking::{self, BookingStatus};
use crate::entities::user::UserRole;
use crate::error::{AppError, AppResult};
use crate::handlers::parse_enum;
use crate::services::bookings::{
    self as engine, BookingChanges, BookingDetails, DateWindow, NewBooking,
};
use crate::utils::datetime;
use crate::utils::extract::AppJson;
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub user_id: Option<i32>,
    pub bike_id: i32,
    #[serde(deserialize_with = "datetime::deserialize")]
    pub pickup_date: NaiveDateTime,
    #[serde(deserialize_with = "datetime::deserialize")]
    pub dropoff_date: NaiveDateTime,
    pub pickup_time: String,
    pub drop_time: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    #[serde(deserialize_with = "datetime::deserialize")]
    pub pickup_date: NaiveDateTime,
    #[serde(deserialize_with = "datetime::deserialize")]
    pub dropoff_date: NaiveDateTime,
    pub pickup_time: String,
    pub drop_time: String,
    pub notes: Option<String>,
}

/// Customers only ever see and touch their own bookings.
fn ensure_booking_access(claims: &Claims, owner_id: i32) -> AppResult<()> {
    if claims.role == UserRole::Customer && claims.sub != owner_id {
        return Err(AppError::Forbidden(
            "You can only access your own bookings".to_string(),
        ));
    }
    Ok(())
}

async fn single(state: &AppState, booking: booking::Model) -> AppResult<Json<BookingDetails>> {
    let mut details = engine::with_details(&state.db, vec![booking]).await?;
    details
        .pop()
        .map(Json)
        .ok_or_else(|| AppError::Internal("Booking details missing".to_string()))
}

pub async fn list_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<BookingDetails>>> {
    let bookings = if claims.role == UserRole::Customer {
        engine::list_by_user(&state.db, claims.sub).await?
    } else {
        engine::list_all(&state.db).await?
    };
    Ok(Json(engine::with_details(&state.db, bookings).await?))
}

pub async fn get_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookingDetails>> {
    let booking = engine::find_by_id(&state.db, id).await?;
    ensure_booking_access(&claims, booking.user_id)?;
    single(&state, booking).await
}

/// Book a bike. The renter defaults to the caller; customers cannot book
/// on behalf of someone else.
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<CreateBookingRequest>,
) -> AppResult<Json<BookingDetails>> {
    let user_id = payload.user_id.unwrap_or(claims.sub);
    ensure_booking_access(&claims, user_id)?;

    let booking = engine::create(
        &state.db,
        NewBooking {
            user_id,
            bike_id: payload.bike_id,
            pickup_date: payload.pickup_date,
            dropoff_date: payload.dropoff_date,
            pickup_time: payload.pickup_time,
            drop_time: payload.drop_time,
            notes: payload.notes,
        },
    )
    .await?;

    single(&state, booking).await
}

pub async fn update_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateBookingRequest>,
) -> AppResult<Json<BookingDetails>> {
    let existing = engine::find_by_id(&state.db, id).await?;
    ensure_booking_access(&claims, existing.user_id)?;

    let booking = engine::update(
        &state.db,
        id,
        BookingChanges {
            pickup_date: payload.pickup_date,
            dropoff_date: payload.dropoff_date,
            pickup_time: payload.pickup_time,
            drop_time: payload.drop_time,
            notes: payload.notes,
        },
    )
    .await?;

    single(&state, booking).await
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookingDetails>> {
    let existing = engine::find_by_id(&state.db, id).await?;
    ensure_booking_access(&claims, existing.user_id)?;

    let booking = engine::cancel(&state.db, id).await?;
    single(&state, booking).await
}

pub async fn confirm_booking(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookingDetails>> {
    let booking = engine::advance(&state.db, id, BookingStatus::Confirmed).await?;
    single(&state, booking).await
}

pub async fn start_booking(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookingDetails>> {
    let booking = engine::advance(&state.db, id, BookingStatus::Active).await?;
    single(&state, booking).await
}

pub async fn complete_booking(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookingDetails>> {
    let booking = engine::advance(&state.db, id, BookingStatus::Completed).await?;
    single(&state, booking).await
}

pub async fn list_by_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<BookingDetails>>> {
    ensure_booking_access(&claims, user_id)?;
    let bookings = engine::list_by_user(&state.db, user_id).await?;
    Ok(Json(engine::with_details(&state.db, bookings).await?))
}

pub async fn list_by_bike(
    State(state): State<AppState>,
    Path(bike_id): Path<i32>,
) -> AppResult<Json<Vec<BookingDetails>>> {
    let bookings = engine::list_by_bike(&state.db, bike_id).await?;
    Ok(Json(engine::with_details(&state.db, bookings).await?))
}

pub async fn list_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> AppResult<Json<Vec<BookingDetails>>> {
    let status = parse_enum::<BookingStatus>(&status, "booking status")?;
    let bookings = engine::list_by_status(&state.db, status).await?;
    Ok(Json(engine::with_details(&state.db, bookings).await?))
}

pub async fn list_by_range(
    State(state): State<AppState>,
    Query(window): Query<DateWindow>,
) -> AppResult<Json<Vec<BookingDetails>>> {
    window.validate()?;
    let bookings =
        engine::list_by_pickup_range(&state.db, window.start_date, window.end_date).await?;
    Ok(Json(engine::with_details(&state.db, bookings).await?))
}

/// CONFIRMED or ACTIVE bookings on the bike overlapping the window.
pub async fn list_conflicts(
    State(state): State<AppState>,
    Path(bike_id): Path<i32>,
    Query(window): Query<DateWindow>,
) -> AppResult<Json<Vec<BookingDetails>>> {
    window.validate()?;
    let bookings =
        engine::find_conflicts(&state.db, bike_id, window.start_date, window.end_date).await?;
    Ok(Json(engine::with_details(&state.db, bookings).await?))
}
