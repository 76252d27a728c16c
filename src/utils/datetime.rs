use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, de};

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Wall-clock time used for every stored timestamp.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Parse an ISO-8601 local date-time, with or without seconds. Offsets are
/// accepted and converted to local time.
pub fn parse(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|dt| dt.with_timezone(&Local).naive_local())
        })
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid date-time '{raw}'")))
}
