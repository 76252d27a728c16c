//! Per-role rollups. Loaders fetch rows; the `summarize_*` reducers are pure
//! so they can be tested without a database.

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;

use crate::entities::bike::{self, BikeStatus};
use crate::entities::booking::{self, BookingStatus};
use crate::entities::user::{self, UserRole};
use crate::error::{AppError, AppResult};
use crate::services::bikes;
use crate::utils::money;

pub const RECENT_BOOKINGS: usize = 5;

/// Flat partner commission on completed bookings.
pub fn partner_commission_rate() -> Decimal {
    Decimal::new(10, 2)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDashboard {
    pub total_bookings: usize,
    pub active_bookings: usize,
    pub recent_bookings: Vec<booking::Model>,
    #[serde(serialize_with = "money::serialize")]
    pub total_spent: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub total_users: usize,
    pub active_users: usize,
    pub users_by_role: BTreeMap<UserRole, usize>,
    pub total_bikes: usize,
    pub bikes_by_status: BTreeMap<BikeStatus, usize>,
    pub available_bikes: usize,
    pub booked_bikes: usize,
    pub total_bookings: usize,
    pub bookings_by_status: BTreeMap<BookingStatus, usize>,
    pub pending_bookings: usize,
    pub active_bookings: usize,
    pub completed_bookings: usize,
    #[serde(serialize_with = "money::serialize")]
    pub total_revenue: Decimal,
}

/// Counts shared by the owner and business dashboards.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FleetStats {
    pub total_bikes: usize,
    pub available_bikes: usize,
    pub booked_bikes: usize,
    pub total_bookings: usize,
    pub active_bookings: usize,
    #[serde(skip)]
    pub completed_total: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerDashboard {
    #[serde(flatten)]
    pub fleet: FleetStats,
    #[serde(serialize_with = "money::serialize")]
    pub total_earnings: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDashboard {
    #[serde(flatten)]
    pub fleet: FleetStats,
    #[serde(serialize_with = "money::serialize")]
    pub total_revenue: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerDashboard {
    pub total_deliveries: usize,
    pub pending_deliveries: usize,
    pub completed_deliveries: usize,
    #[serde(serialize_with = "money::serialize")]
    pub total_earnings: Decimal,
}

fn count_status(bookings: &[booking::Model], status: BookingStatus) -> usize {
    bookings.iter().filter(|b| b.status == status).count()
}

fn completed_total(bookings: &[booking::Model]) -> Decimal {
    bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Completed)
        .map(|b| b.total_price)
        .sum()
}

pub fn summarize_customer(mut bookings: Vec<booking::Model>) -> CustomerDashboard {
    let total_bookings = bookings.len();
    let active_bookings = bookings
        .iter()
        .filter(|b| matches!(b.status, BookingStatus::Confirmed | BookingStatus::Active))
        .count();
    let total_spent = completed_total(&bookings);

    bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    bookings.truncate(RECENT_BOOKINGS);

    CustomerDashboard {
        total_bookings,
        active_bookings,
        recent_bookings: bookings,
        total_spent,
    }
}

pub fn summarize_admin(
    users: &[user::Model],
    bikes: &[bike::Model],
    bookings: &[booking::Model],
) -> AdminDashboard {
    let mut users_by_role: BTreeMap<UserRole, usize> =
        UserRole::ALL.into_iter().map(|r| (r, 0)).collect();
    for u in users {
        *users_by_role.entry(u.role).or_default() += 1;
    }

    let mut bikes_by_status: BTreeMap<BikeStatus, usize> =
        BikeStatus::ALL.into_iter().map(|s| (s, 0)).collect();
    for b in bikes {
        *bikes_by_status.entry(b.status).or_default() += 1;
    }

    let mut bookings_by_status: BTreeMap<BookingStatus, usize> =
        BookingStatus::ALL.into_iter().map(|s| (s, 0)).collect();
    for b in bookings {
        *bookings_by_status.entry(b.status).or_default() += 1;
    }

    AdminDashboard {
        total_users: users.len(),
        active_users: users.iter().filter(|u| u.is_active).count(),
        total_bikes: bikes.len(),
        available_bikes: bikes_by_status[&BikeStatus::Available],
        booked_bikes: bikes_by_status[&BikeStatus::Booked],
        total_bookings: bookings.len(),
        pending_bookings: bookings_by_status[&BookingStatus::Pending],
        active_bookings: bookings_by_status[&BookingStatus::Active],
        completed_bookings: bookings_by_status[&BookingStatus::Completed],
        total_revenue: completed_total(bookings),
        users_by_role,
        bikes_by_status,
        bookings_by_status,
    }
}

/// `fleet` is the owner's active bikes; bookings on other bikes are ignored.
pub fn summarize_fleet(fleet: &[bike::Model], bookings: &[booking::Model]) -> FleetStats {
    let bike_ids: HashSet<i32> = fleet.iter().map(|b| b.id).collect();
    let on_fleet: Vec<booking::Model> = bookings
        .iter()
        .filter(|b| bike_ids.contains(&b.bike_id))
        .cloned()
        .collect();

    FleetStats {
        total_bikes: fleet.len(),
        available_bikes: fleet.iter().filter(|b| b.status == BikeStatus::Available).count(),
        booked_bikes: fleet.iter().filter(|b| b.status == BikeStatus::Booked).count(),
        total_bookings: on_fleet.len(),
        active_bookings: count_status(&on_fleet, BookingStatus::Active),
        completed_total: completed_total(&on_fleet),
    }
}

/// Deliveries are not assigned to partners yet, so every booking counts.
pub fn summarize_partner(bookings: &[booking::Model]) -> PartnerDashboard {
    PartnerDashboard {
        total_deliveries: bookings.len(),
        pending_deliveries: count_status(bookings, BookingStatus::Pending),
        completed_deliveries: count_status(bookings, BookingStatus::Completed),
        total_earnings: completed_total(bookings) * partner_commission_rate(),
    }
}

async fn ensure_user<C>(db: &C, user_id: i32) -> AppResult<()>
where
    C: ConnectionTrait,
{
    match user::Entity::find_by_id(user_id).one(db).await? {
        Some(_) => Ok(()),
        None => Err(AppError::BadRequest(format!(
            "User not found with ID: {}",
            user_id
        ))),
    }
}

async fn fleet_stats<C>(db: &C, owner_id: i32) -> AppResult<FleetStats>
where
    C: ConnectionTrait,
{
    ensure_user(db, owner_id).await?;
    let fleet = bikes::list_active_owned(db, owner_id).await?;
    let ids: Vec<i32> = fleet.iter().map(|b| b.id).collect();
    let bookings = booking::Entity::find()
        .filter(booking::Column::BikeId.is_in(ids))
        .all(db)
        .await?;
    Ok(summarize_fleet(&fleet, &bookings))
}

pub async fn customer<C>(db: &C, user_id: i32) -> AppResult<CustomerDashboard>
where
    C: ConnectionTrait,
{
    ensure_user(db, user_id).await?;
    let bookings = booking::Entity::find()
        .filter(booking::Column::UserId.eq(user_id))
        .order_by_desc(booking::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(summarize_customer(bookings))
}

pub async fn admin<C>(db: &C) -> AppResult<AdminDashboard>
where
    C: ConnectionTrait,
{
    let users = user::Entity::find().all(db).await?;
    let bikes = bike::Entity::find().all(db).await?;
    let bookings = booking::Entity::find().all(db).await?;
    Ok(summarize_admin(&users, &bikes, &bookings))
}

pub async fn owner<C>(db: &C, user_id: i32) -> AppResult<OwnerDashboard>
where
    C: ConnectionTrait,
{
    let fleet = fleet_stats(db, user_id).await?;
    Ok(OwnerDashboard {
        total_earnings: fleet.completed_total,
        fleet,
    })
}

pub async fn business<C>(db: &C, user_id: i32) -> AppResult<BusinessDashboard>
where
    C: ConnectionTrait,
{
    let fleet = fleet_stats(db, user_id).await?;
    Ok(BusinessDashboard {
        total_revenue: fleet.completed_total,
        fleet,
    })
}

pub async fn partner<C>(db: &C, user_id: i32) -> AppResult<PartnerDashboard>
where
    C: ConnectionTrait,
{
    ensure_user(db, user_id).await?;
    let bookings = booking::Entity::find().all(db).await?;
    Ok(summarize_partner(&bookings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::bike::BikeType;
    use chrono::NaiveDate;

    fn at(day: u32) -> sea_orm::prelude::DateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn booking(id: i32, bike_id: i32, status: BookingStatus, price: i64) -> booking::Model {
        booking::Model {
            id,
            user_id: 1,
            bike_id,
            pickup_date: at(1),
            dropoff_date: at(2),
            pickup_time: "09:00".to_string(),
            drop_time: "18:00".to_string(),
            actual_pickup_date: None,
            actual_dropoff_date: None,
            total_price: Decimal::new(price, 0),
            status,
            notes: None,
            created_at: at(id as u32),
            updated_at: at(id as u32),
        }
    }

    fn bike(id: i32, status: BikeStatus) -> bike::Model {
        bike::Model {
            id,
            brand: "Honda".to_string(),
            model: "Activa".to_string(),
            year: 2022,
            bike_type: BikeType::Scooter,
            city: "Pune".to_string(),
            price_per_hour: Decimal::new(100, 0),
            price_per_day: Decimal::new(800, 0),
            price_per_month: Decimal::new(15000, 0),
            owner_id: Some(9),
            description: None,
            status,
            image_url: None,
            is_active: true,
            created_at: at(1),
            updated_at: at(1),
        }
    }

    fn user(id: i32, role: UserRole, is_active: bool) -> user::Model {
        user::Model {
            id,
            name: format!("user{id}"),
            email: format!("user{id}@example.com"),
            phone: None,
            password: String::new(),
            role,
            address: None,
            is_active,
            created_at: at(1),
            updated_at: at(1),
        }
    }

    #[test]
    fn test_customer_counts_and_recent_window() {
        let bookings = vec![
            booking(1, 1, BookingStatus::Completed, 300),
            booking(2, 1, BookingStatus::Confirmed, 100),
            booking(3, 1, BookingStatus::Active, 100),
            booking(4, 1, BookingStatus::Completed, 200),
            booking(5, 1, BookingStatus::Cancelled, 900),
            booking(6, 1, BookingStatus::Pending, 50),
        ];
        let dash = summarize_customer(bookings);

        assert_eq!(dash.total_bookings, 6);
        assert_eq!(dash.active_bookings, 2);
        assert_eq!(dash.total_spent, Decimal::new(500, 0));
        assert_eq!(dash.recent_bookings.len(), RECENT_BOOKINGS);
        assert_eq!(dash.recent_bookings[0].id, 6);
        assert!(dash.recent_bookings.iter().all(|b| b.id != 1));
    }

    #[test]
    fn test_admin_maps_are_zero_filled() {
        let dash = summarize_admin(&[], &[], &[]);

        assert_eq!(dash.users_by_role.len(), UserRole::ALL.len());
        assert_eq!(dash.bikes_by_status.len(), BikeStatus::ALL.len());
        assert_eq!(dash.bookings_by_status.len(), BookingStatus::ALL.len());
        assert!(dash.users_by_role.values().all(|&n| n == 0));
        assert_eq!(dash.total_revenue, Decimal::ZERO);
    }

    #[test]
    fn test_admin_revenue_is_sum_of_completed() {
        let users = vec![
            user(1, UserRole::Admin, true),
            user(2, UserRole::Customer, true),
            user(3, UserRole::Customer, false),
        ];
        let bikes = vec![bike(1, BikeStatus::Available), bike(2, BikeStatus::Booked)];
        let bookings = vec![
            booking(1, 1, BookingStatus::Completed, 4500),
            booking(2, 2, BookingStatus::Completed, 500),
            booking(3, 2, BookingStatus::Pending, 700),
        ];
        let dash = summarize_admin(&users, &bikes, &bookings);

        assert_eq!(dash.total_users, 3);
        assert_eq!(dash.active_users, 2);
        assert_eq!(dash.users_by_role[&UserRole::Customer], 2);
        assert_eq!(dash.available_bikes, 1);
        assert_eq!(dash.booked_bikes, 1);
        assert_eq!(dash.pending_bookings, 1);
        assert_eq!(dash.completed_bookings, 2);
        assert_eq!(dash.total_revenue, Decimal::new(5000, 0));
    }

    #[test]
    fn test_fleet_ignores_other_bikes() {
        let fleet = vec![bike(1, BikeStatus::Booked), bike(2, BikeStatus::Available)];
        let bookings = vec![
            booking(1, 1, BookingStatus::Active, 100),
            booking(2, 2, BookingStatus::Completed, 250),
            booking(3, 77, BookingStatus::Completed, 10_000),
        ];
        let stats = summarize_fleet(&fleet, &bookings);

        assert_eq!(stats.total_bikes, 2);
        assert_eq!(stats.available_bikes, 1);
        assert_eq!(stats.booked_bikes, 1);
        assert_eq!(stats.total_bookings, 2);
        assert_eq!(stats.active_bookings, 1);
        assert_eq!(stats.completed_total, Decimal::new(250, 0));
    }

    #[test]
    fn test_partner_earns_ten_percent() {
        let bookings = vec![
            booking(1, 1, BookingStatus::Completed, 4500),
            booking(2, 1, BookingStatus::Pending, 100),
        ];
        let dash = summarize_partner(&bookings);

        assert_eq!(dash.total_deliveries, 2);
        assert_eq!(dash.pending_deliveries, 1);
        assert_eq!(dash.completed_deliveries, 1);
        assert_eq!(dash.total_earnings, Decimal::new(450, 0));
    }
}
