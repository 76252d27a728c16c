use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};
use crate::utils::money;

/// Whole hours between pickup and dropoff, fractional hours dropped, never
/// less than one. A dropoff at or before pickup still bills one hour.
pub fn billable_hours(pickup: NaiveDateTime, dropoff: NaiveDateTime) -> i64 {
    let hours = (dropoff - pickup).num_hours();
    if hours <= 0 { 1 } else { hours }
}

/// Hourly rate times billable hours. The total must fit a money column.
pub fn total_price(
    price_per_hour: Decimal,
    pickup: NaiveDateTime,
    dropoff: NaiveDateTime,
) -> AppResult<Decimal> {
    price_per_hour
        .checked_mul(Decimal::from(billable_hours(pickup, dropoff)))
        .filter(|total| money::in_range(*total))
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "Total price exceeds the maximum of {}",
                money::MAX_AMOUNT
            ))
        })
}
