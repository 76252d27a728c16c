use chrono::{Duration, NaiveTime};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder};

use crate::entities::bike::{self, BikeType};
use crate::entities::booking::{self, BookingStatus};
use crate::entities::user::UserRole;
use crate::error::AppResult;
use crate::services::bikes::{self, BikeInput};
use crate::services::bookings::{self, NewBooking};
use crate::services::users::{self, NewUser};
use crate::utils::datetime;

pub const ADMIN_EMAIL: &str = "admin@spingo.com";
const ADMIN_PASSWORD: &str = "admin123";
const DEMO_PASSWORD: &str = "password123";
const DEMO_IMAGE: &str =
    "https://images.unsplash.com/photo-1558618047-3c8c76ca7d13?w=500&h=300&fit=crop&crop=center";

/// Create the admin account if it doesn't exist.
pub async fn ensure_admin(db: &DatabaseConnection) -> AppResult<()> {
    if users::find_by_email(db, ADMIN_EMAIL).await?.is_some() {
        return Ok(());
    }

    users::create(
        db,
        NewUser {
            name: "Admin User".to_string(),
            email: ADMIN_EMAIL.to_string(),
            phone: Some("9876543210".to_string()),
            password: ADMIN_PASSWORD.to_string(),
            role: UserRole::Admin,
            address: Some("Admin Office, Mumbai".to_string()),
        },
    )
    .await?;

    tracing::info!("Admin account created: {}", ADMIN_EMAIL);
    Ok(())
}

/// Demo users, a fleet split between one owner and one business, and two
/// bookings. Each table is only filled when it is empty.
pub async fn seed_demo_data(db: &DatabaseConnection) -> AppResult<()> {
    seed_users(db).await?;
    seed_bikes(db).await?;
    seed_bookings(db).await?;
    Ok(())
}

async fn seed_users(db: &DatabaseConnection) -> AppResult<()> {
    let demo = [
        ("John Doe", "john@example.com", "9876543211", UserRole::Customer, "123 Main St, Delhi"),
        ("Jane Smith", "jane@example.com", "9876543212", UserRole::Customer, "456 Park Ave, Bangalore"),
        ("Alice Johnson", "alice@example.com", "9876543216", UserRole::Customer, "789 Pine St, Chennai"),
        ("Mike Johnson", "mike@example.com", "9876543213", UserRole::IndividualOwner, "321 Elm St, Kolkata"),
        ("Sarah Wilson", "sarah@example.com", "9876543214", UserRole::RentalBusiness, "654 Maple Ave, Hyderabad"),
        ("Tom Brown", "tom@example.com", "9876543215", UserRole::DeliveryPartner, "987 Cedar St, Pune"),
    ];

    let mut created = 0;
    for (name, email, phone, role, address) in demo {
        if users::find_by_email(db, email).await?.is_some() {
            continue;
        }
        users::create(
            db,
            NewUser {
                name: name.to_string(),
                email: email.to_string(),
                phone: Some(phone.to_string()),
                password: DEMO_PASSWORD.to_string(),
                role,
                address: Some(address.to_string()),
            },
        )
        .await?;
        created += 1;
    }

    if created > 0 {
        tracing::info!(count = created, "Demo users seeded");
    }
    Ok(())
}

async fn seed_bikes(db: &DatabaseConnection) -> AppResult<()> {
    if bike::Entity::find().count(db).await? > 0 {
        return Ok(());
    }

    let owner = users::find_by_email(db, "mike@example.com").await?.map(|u| u.id);
    let business = users::find_by_email(db, "sarah@example.com").await?.map(|u| u.id);

    let fleet = [
        ("Honda", "CBR600RR", BikeType::Sport, "Mumbai", 500, owner, "High-performance sports bike perfect for city rides"),
        ("Honda", "Shadow", BikeType::Cruiser, "Chennai", 400, business, "Classic cruiser for comfortable long rides"),
        ("Yamaha", "R1", BikeType::Sport, "Delhi", 600, owner, "Racing-inspired sport bike with advanced technology"),
        ("Yamaha", "FZ", BikeType::Sport, "Bangalore", 350, business, "Stylish and efficient city bike"),
        ("Kawasaki", "Ninja", BikeType::Sport, "Mumbai", 550, owner, "Legendary Ninja series for adrenaline seekers"),
        ("Kawasaki", "Vulcan", BikeType::Cruiser, "Chennai", 450, business, "Powerful cruiser for long-distance touring"),
        ("Ducati", "Panigale", BikeType::Sport, "Delhi", 800, owner, "Italian masterpiece with unmatched performance"),
        ("Ducati", "Monster", BikeType::Sport, "Bangalore", 700, business, "Iconic naked bike with raw power"),
        ("BMW", "S1000RR", BikeType::Sport, "Mumbai", 900, owner, "German engineering meets racing performance"),
        ("BMW", "R1200GS", BikeType::Touring, "Chennai", 750, business, "Adventure touring bike for any terrain"),
    ];

    for (brand, model, bike_type, city, hourly, owner_id, description) in fleet {
        bikes::create(
            db,
            BikeInput {
                brand: brand.to_string(),
                model: model.to_string(),
                year: 2023,
                bike_type,
                city: city.to_string(),
                price_per_hour: Decimal::from(hourly),
                price_per_day: Decimal::from(hourly * 6),
                price_per_month: Decimal::from(hourly * 120),
                owner_id,
                description: Some(description.to_string()),
                status: None,
                image_url: Some(DEMO_IMAGE.to_string()),
                is_active: Some(true),
            },
        )
        .await?;
    }

    tracing::info!(count = fleet.len(), "Demo bikes seeded");
    Ok(())
}

async fn seed_bookings(db: &DatabaseConnection) -> AppResult<()> {
    if booking::Entity::find().count(db).await? > 0 {
        return Ok(());
    }

    let customers = [
        users::find_by_email(db, "john@example.com").await?,
        users::find_by_email(db, "jane@example.com").await?,
    ];
    let fleet: Vec<i32> = bike::Entity::find()
        .order_by_asc(bike::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(|b| b.id)
        .collect();

    let today = datetime::now().date();
    let plans = [
        (1, (9, "09:00"), (18, "18:00"), BookingStatus::Pending),
        (3, (10, "10:00"), (16, "16:00"), BookingStatus::Confirmed),
    ];

    for ((customer, bike_id), (days_ahead, (from, pickup), (to, drop), status)) in
        customers.iter().zip(fleet.iter()).zip(plans)
    {
        let Some(customer) = customer else { continue };
        let day = today + Duration::days(days_ahead);
        let (Some(from), Some(to)) = (
            NaiveTime::from_hms_opt(from, 0, 0),
            NaiveTime::from_hms_opt(to, 0, 0),
        ) else {
            continue;
        };

        let booking = bookings::create(
            db,
            NewBooking {
                user_id: customer.id,
                bike_id: *bike_id,
                pickup_date: day.and_time(from),
                dropoff_date: day.and_time(to),
                pickup_time: pickup.to_string(),
                drop_time: drop.to_string(),
                notes: None,
            },
        )
        .await?;

        if status == BookingStatus::Confirmed {
            bookings::advance(db, booking.id, BookingStatus::Confirmed).await?;
        }
    }

    tracing::info!("Demo bookings seeded");
    Ok(())
}
