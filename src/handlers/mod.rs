use sea_orm::ActiveEnum;

use crate::error::{AppError, AppResult};

pub mod auth;
pub mod bikes;
pub mod bookings;
pub mod dashboard;
pub mod users;

/// Case-insensitive parse of an enum path or query segment, e.g. `available`.
pub(crate) fn parse_enum<E>(raw: &str, what: &str) -> AppResult<E>
where
    E: ActiveEnum<Value = String>,
{
    E::try_from_value(&raw.trim().to_ascii_uppercase())
        .map_err(|_| AppError::BadRequest(format!("Invalid {}: {}", what, raw)))
}
