use rust_decimal::Decimal;
use serde::Serializer;
use validator::ValidationError;

/// Largest amount a DECIMAL(10,2) money column holds.
/// 99_999_999.99, i.e. mantissa 9_999_999_999 at scale 2 (`Decimal::new` is not const).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0x540B_E3FF, 2, 0, false, 2);

pub fn in_range(value: Decimal) -> bool {
    value > Decimal::ZERO && value <= MAX_AMOUNT
}

/// Field check for listing prices.
pub fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    if in_range(*value) {
        Ok(())
    } else {
        Err(ValidationError::new("price_range"))
    }
}

/// Money is carried with exactly two fractional digits.
pub fn to_cents_scale(value: Decimal) -> Decimal {
    let mut scaled = value;
    scaled.rescale(2);
    scaled
}

pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&to_cents_scale(*value).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_amounts_gain_two_places() {
        assert_eq!(to_cents_scale(Decimal::from(4500)).to_string(), "4500.00");
    }

    #[test]
    fn test_fractions_round_to_cents() {
        assert_eq!(to_cents_scale(Decimal::new(45006, 3)).to_string(), "45.01");
        assert_eq!(to_cents_scale(Decimal::new(2400, 1)).to_string(), "240.00");
    }

    #[test]
    fn test_price_bounds() {
        assert!(validate_price(&Decimal::new(1, 2)).is_ok());
        assert!(validate_price(&MAX_AMOUNT).is_ok());
        assert!(validate_price(&Decimal::ZERO).is_err());
        assert!(validate_price(&Decimal::new(-500, 2)).is_err());
        assert!(validate_price(&Decimal::from(100_000_000)).is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        #[derive(serde::Serialize)]
        struct Price {
            #[serde(serialize_with = "serialize")]
            amount: Decimal,
        }

        let json = serde_json::to_value(Price {
            amount: Decimal::new(5, 0),
        })
        .unwrap();
        assert_eq!(json["amount"], "5.00");
    }
}
