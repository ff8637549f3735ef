//! Fixed-offset calendar and inclusive date windows.
//!
//! Every instant entering the core is projected onto a date-only anchor in a
//! single fixed UTC offset. Mixing offsets is what produces off-by-one day
//! counts, so nothing else in the crate converts timestamps.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use serde::Serialize;

use crate::types::ValidationError;

/// Offset used when none is configured (UTC+8).
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;

const SECONDS_PER_HOUR: i32 = 3600;

/// Calendar configuration shared by every computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarConfig {
    utc_offset: FixedOffset,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            utc_offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * SECONDS_PER_HOUR)
                .expect("default UTC offset is in range"),
        }
    }
}

impl CalendarConfig {
    /// Creates a calendar anchored at a whole-hour UTC offset.
    pub fn with_offset_hours(hours: i32) -> Result<Self, ValidationError> {
        if !(-23..=23).contains(&hours) {
            return Err(ValidationError::OffsetOutOfRange { hours });
        }
        FixedOffset::east_opt(hours * SECONDS_PER_HOUR)
            .map(|utc_offset| Self { utc_offset })
            .ok_or(ValidationError::OffsetOutOfRange { hours })
    }

    pub const fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    /// Projects an instant onto its calendar day in the configured offset.
    pub fn date_of<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> NaiveDate {
        instant.with_timezone(&self.utc_offset).date_naive()
    }

    /// The current calendar day in the configured offset.
    pub fn today(&self) -> NaiveDate {
        self.date_of(&Utc::now())
    }

    /// Midnight of `date` in the configured offset.
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<FixedOffset> {
        let local_midnight = date.and_time(NaiveTime::MIN);
        let offset = TimeDelta::seconds(i64::from(self.utc_offset.local_minus_utc()));
        self.utc_offset.from_utc_datetime(&(local_midnight - offset))
    }
}

/// An inclusive range of calendar days.
///
/// A window whose end precedes its start is empty rather than invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    pub const fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Builds a window from wall-clock instants, projecting both bounds.
    pub fn from_instants<Tz: TimeZone>(
        from: &DateTime<Tz>,
        to: &DateTime<Tz>,
        calendar: &CalendarConfig,
    ) -> Self {
        Self {
            from: calendar.date_of(from),
            to: calendar.date_of(to),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to < self.from
    }

    /// Number of calendar days covered, counting both ends.
    pub fn len_days(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            (self.to - self.from).num_days() + 1
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Every day in the window, oldest first.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let to = self.to;
        self.from.iter_days().take_while(move |day| *day <= to)
    }
}
