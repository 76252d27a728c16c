//! Data access and business rules. Handlers stay thin and call into these.

pub mod bikes;
pub mod bookings;
pub mod dashboard;
pub mod pricing;
pub mod users;
