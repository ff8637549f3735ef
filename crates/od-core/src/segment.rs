//! Abroad segments: inclusive date intervals spent outside the territory.

use chrono::NaiveDate;
use serde::Serialize;

/// A continuous stay abroad, `[exit_date, entry_date]` inclusive.
///
/// `entry_date = None` means no matching entry was found and the stay runs
/// through "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbroadSegment {
    pub exit_date: NaiveDate,
    pub entry_date: Option<NaiveDate>,
}

impl AbroadSegment {
    /// A segment closed by an entry. A reversed pair is swapped.
    pub fn closed(exit_date: NaiveDate, entry_date: NaiveDate) -> Self {
        Self {
            exit_date: exit_date.min(entry_date),
            entry_date: Some(exit_date.max(entry_date)),
        }
    }

    /// A segment still open as of computation time.
    pub const fn open(exit_date: NaiveDate) -> Self {
        Self {
            exit_date,
            entry_date: None,
        }
    }

    pub const fn is_open(&self) -> bool {
        self.entry_date.is_none()
    }

    /// Last day of the segment, resolving an open end to `today`.
    ///
    /// An open segment whose exit lies after `today` covers only its exit day.
    pub fn end_or(&self, today: NaiveDate) -> NaiveDate {
        self.entry_date.unwrap_or(today).max(self.exit_date)
    }

    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        self.exit_date <= date && date <= self.end_or(today)
    }
}

/// Collapses overlapping or adjacent segments into a single timeline.
///
/// The result is sorted by exit date and pairwise disjoint with at least one
/// domestic day between consecutive segments.
pub fn merge_segments(mut segments: Vec<AbroadSegment>, today: NaiveDate) -> Vec<AbroadSegment> {
    segments.sort_by_key(|s| s.exit_date);

    let mut merged: Vec<AbroadSegment> = Vec::with_capacity(segments.len());
    for segment in segments {
        if let Some(last) = merged.last_mut() {
            let last_end = last.end_or(today);
            let touches = last_end
                .succ_opt()
                .is_none_or(|next_day| segment.exit_date <= next_day);
            if touches {
                let end = last_end.max(segment.end_or(today));
                // An open end resolves against the merged exit date, so it only
                // survives when that still lands on the combined last day.
                let open =
                    (last.is_open() || segment.is_open()) && end == today.max(last.exit_date);
                last.entry_date = if open { None } else { Some(end) };
                continue;
            }
        }
        merged.push(segment);
    }
    merged
}

/// Returns true if `date` falls inside any of the merged, sorted `segments`.
pub fn covers(segments: &[AbroadSegment], date: NaiveDate, today: NaiveDate) -> bool {
    let idx = segments.partition_point(|s| s.exit_date <= date);
    idx > 0 && segments[idx - 1].contains(date, today)
}
