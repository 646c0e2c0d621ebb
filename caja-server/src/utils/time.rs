//! Time helpers - business-timezone conversions
//!
//! All date→timestamp conversions happen at the API handler layer;
//! storage and the reconciler only ever see `i64` Unix millis.

use chrono::NaiveDate;
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// Date + h/m/s → Unix millis in the business timezone.
///
/// DST gap fallback: if the local time does not exist, fall back to UTC.
pub fn date_hms_to_millis(date: NaiveDate, hour: u32, min: u32, sec: u32, tz: Tz) -> i64 {
    let naive = date.and_hms_opt(hour, min, sec).unwrap();
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Start of day (00:00:00) → Unix millis in the business timezone
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_hms_to_millis(date, 0, 0, 0, tz)
}

/// End of day → next day 00:00:00 Unix millis.
///
/// Callers use exclusive `< end` semantics.
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    date_hms_to_millis(next_day, 0, 0, 0, tz)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_valid() {
        let d = parse_date("2026-03-15").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2026, 3, 15).unwrap());
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date("15/03/2026").is_err());
        assert!(parse_date("not-a-date").is_err());
    }

    #[test]
    fn test_day_bounds_are_exclusive_end() {
        let tz = chrono_tz::UTC;
        let d = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let start = day_start_millis(d, tz);
        let end = day_end_millis(d, tz);
        assert_eq!(end - start, 24 * 3600 * 1000);
    }
}
