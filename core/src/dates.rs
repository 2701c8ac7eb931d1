use time::format_description::well_known::Rfc3339;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

const DAY_MS: i64 = 86_400_000;

const DATE_ONLY: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a published/updated date into unix milliseconds. Accepts plain
/// `YYYY-MM-DD` (interpreted as midnight UTC) and full RFC 3339 timestamps.
pub fn parse_ms(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(ts) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some((ts.unix_timestamp_nanos() / 1_000_000) as i64);
    }
    if let Ok(date) = Date::parse(value, DATE_ONLY) {
        let midnight = date.midnight().assume_utc();
        return Some((midnight.unix_timestamp_nanos() / 1_000_000) as i64);
    }
    None
}

/// Floor a timestamp to 00:00:00.000 of its UTC day.
pub fn day_floor_ms(ms: i64) -> i64 {
    ms - ms.rem_euclid(DAY_MS)
}

/// Ceil a timestamp to 23:59:59.999 of its UTC day.
pub fn day_ceil_ms(ms: i64) -> i64 {
    day_floor_ms(ms) + (DAY_MS - 1)
}
