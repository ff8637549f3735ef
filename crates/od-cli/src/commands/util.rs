//! Shared utilities for CLI commands.

use std::fmt;
use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use od_core::CalendarConfig;
use regex::Regex;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(day|week)s?\s+ago$").unwrap());

/// Conservative bounds for relative time parsing (~1000 years in days).
const MAX_RELATIVE_DAYS: i64 = 1000 * 365;

/// Parse a window bound as a calendar date, ISO 8601 instant or relative time.
///
/// Supports:
/// - Calendar date: "2024-01-01" (midnight in the configured offset)
/// - ISO 8601: "2024-01-15T10:30:00Z"
/// - Relative: "today", "30 days ago", "2 weeks ago"
pub fn parse_when(
    s: &str,
    calendar: &CalendarConfig,
    now: DateTime<Utc>,
) -> anyhow::Result<DateTime<FixedOffset>> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(calendar.start_of_day(date));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }

    if s.eq_ignore_ascii_case("today") {
        return Ok(now.with_timezone(&calendar.utc_offset()));
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid date: {s}. Use YYYY-MM-DD, ISO 8601 (e.g., 2024-01-15T10:30:00Z) or relative (e.g., '30 days ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, days_per_unit) = match &caps[2] {
        "day" => (MAX_RELATIVE_DAYS, 1),
        "week" => (MAX_RELATIVE_DAYS / 7, 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    let instant = now - Duration::days(n * days_per_unit);
    Ok(instant.with_timezone(&calendar.utc_offset()))
}

/// Parse a plain calendar date (YYYY-MM-DD).
pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date {s:?}, expected YYYY-MM-DD"))
}

/// Formats a count with a singular or plural noun.
pub fn plural<T: fmt::Display + PartialEq + From<u8>>(count: T, noun: &str) -> String {
    if count == T::from(1) {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_calendar_date_is_local_midnight() {
        let calendar = CalendarConfig::default();
        let parsed = parse_when("2024-01-01", &calendar, now()).unwrap();
        assert_eq!(calendar.date_of(&parsed), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(
            parsed.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2023, 12, 31, 16, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_rfc3339_keeps_instant() {
        let calendar = CalendarConfig::default();
        let parsed = parse_when("2024-03-15T17:30:00Z", &calendar, now()).unwrap();
        assert_eq!(calendar.date_of(&parsed), NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
    }

    #[test]
    fn test_relative_days() {
        let calendar = CalendarConfig::default();
        let parsed = parse_when("30 days ago", &calendar, now()).unwrap();
        assert_eq!(calendar.date_of(&parsed), NaiveDate::from_ymd_opt(2024, 5, 16).unwrap());
    }

    #[test]
    fn test_relative_weeks_and_today() {
        let calendar = CalendarConfig::default();
        let weeks = parse_when("2 weeks ago", &calendar, now()).unwrap();
        assert_eq!(calendar.date_of(&weeks), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let today = parse_when("today", &calendar, now()).unwrap();
        assert_eq!(calendar.date_of(&today), NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
    }

    #[test]
    fn test_invalid_input_errors() {
        let calendar = CalendarConfig::default();
        assert!(parse_when("next tuesday", &calendar, now()).is_err());
        assert!(parse_when("2024-02-30", &calendar, now()).is_err());
        assert!(parse_when("999999 weeks ago", &calendar, now()).is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-01-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
        assert!(parse_date("01/01/2025").is_err());
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "day"), "1 day");
        assert_eq!(plural(0, "day"), "0 days");
        assert_eq!(plural(3, "record"), "3 records");
    }
}
