//! Internal helpers for input validation and date arithmetic.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every operation enforces the same rules.

use chrono::{DateTime, Days, Months, NaiveDate, NaiveTime, TimeDelta, Utc};

use crate::{EngineError, ResultEngine};

/// Trim a name and reject it when nothing is left.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim optional free text; blank becomes `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

pub(crate) fn ensure_positive_amount(amount_minor: i64) -> ResultEngine<()> {
    if amount_minor <= 0 {
        return Err(EngineError::InvalidAmount(
            "amount must be > 0".to_string(),
        ));
    }
    Ok(())
}

/// `date` at 00:00:00 UTC.
pub(crate) fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// `date` at 23:59:59 UTC.
pub(crate) fn day_end(date: NaiveDate) -> DateTime<Utc> {
    day_start(date) + TimeDelta::seconds(86_399)
}

/// Midnight UTC of the day after `date`.
pub(crate) fn next_day_start(date: NaiveDate) -> ResultEngine<DateTime<Utc>> {
    date.checked_add_days(Days::new(1))
        .map(day_start)
        .ok_or_else(|| EngineError::InvalidDate(format!("date out of range: {date}")))
}

/// Parse `YYYY-MM` into the first day of the month and the last millisecond of
/// its last day, both UTC.
pub(crate) fn month_bounds(month: &str) -> ResultEngine<(DateTime<Utc>, DateTime<Utc>)> {
    let invalid = || EngineError::InvalidDate(format!("invalid month, expected YYYY-MM: {month}"));

    let (year, mon) = month.split_once('-').ok_or_else(invalid)?;
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if year.len() != 4 || mon.len() != 2 || !digits(year) || !digits(mon) {
        return Err(invalid());
    }
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let mon: u32 = mon.parse().map_err(|_| invalid())?;
    let first = NaiveDate::from_ymd_opt(year, mon, 1).ok_or_else(invalid)?;
    let next = first.checked_add_months(Months::new(1)).ok_or_else(invalid)?;

    let start = day_start(first);
    let end = day_start(next) - TimeDelta::milliseconds(1);
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        assert!(normalize_required_name("   ", "wallet").is_err());
        assert_eq!(normalize_required_name(" Cash ", "wallet").unwrap(), "Cash");
    }

    #[test]
    fn blank_note_becomes_none() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(normalize_optional_text(None), None);
        assert_eq!(
            normalize_optional_text(Some(" lunch ")),
            Some("lunch".to_string())
        );
    }

    #[test]
    fn amount_must_be_positive() {
        assert!(ensure_positive_amount(0).is_err());
        assert!(ensure_positive_amount(-5).is_err());
        assert!(ensure_positive_amount(1).is_ok());
    }

    #[test]
    fn month_bounds_cover_whole_month() {
        let (start, end) = month_bounds("2024-02").unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        assert_eq!(
            end,
            Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap() + TimeDelta::milliseconds(999)
        );
    }

    #[test]
    fn december_rolls_over_year() {
        let (_, end) = month_bounds("2023-12").unwrap();
        assert_eq!(
            end,
            Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap() + TimeDelta::milliseconds(999)
        );
    }

    #[test]
    fn malformed_months_are_rejected() {
        for month in ["2024-13", "2024-1", "24-01", "2024/01", "", "2024-00", "2024-+1"] {
            assert!(
                matches!(month_bounds(month), Err(EngineError::InvalidDate(_))),
                "{month}"
            );
        }
    }

    #[test]
    fn day_bounds() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(day_start(date), Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap());
        assert_eq!(day_end(date), Utc.with_ymd_and_hms(2024, 1, 10, 23, 59, 59).unwrap());
        assert_eq!(
            next_day_start(date).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 11, 0, 0, 0).unwrap()
        );
    }
}
