//! Overseas-day counting.
//!
//! Converts exit/entry events into the set of calendar days spent abroad and
//! answers how many of those days fall inside a query window.
//!
//! # Algorithm Summary
//!
//! 1. Partition events by document identity and order each partition
//!    chronologically (see [`crate::chronology`]).
//! 2. Walk each partition, materializing every abroad day into one shared
//!    date set ("day-fill"). A re-exit before the matching entry fills up to
//!    the day before the new exit; a trailing exit fills through today.
//! 3. Count window days present in the set. The set is a union, so a day
//!    covered by several documents is counted once.
//! 4. Separately, bracket-match exits to entries per document, merge the
//!    resulting segments across documents, and classify in-window records
//!    against that timeline.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, TimeZone};
use serde::Serialize;

use crate::calendar::{CalendarConfig, DateWindow};
use crate::chronology::logical_time_order;
use crate::event::{BorderEvent, CrossingType};
use crate::segment::{AbroadSegment, covers, merge_segments};
use crate::types::DocumentIdentity;

/// Result of an overseas-day calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    /// The normalized query window.
    pub window: DateWindow,

    /// Days inside the window spent abroad under any document.
    pub total_overseas_days: usize,

    /// Events dated inside the window, regardless of classification.
    pub total_records: usize,

    /// In-window events dated on an abroad day, in input order.
    pub overseas_records: Vec<BorderEvent>,

    /// In-window events dated on a domestic day, in input order.
    pub domestic_records: Vec<BorderEvent>,

    /// Merged abroad timeline across all documents, not clipped to the window.
    pub segments: Vec<AbroadSegment>,
}

/// Overseas days attributable to a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDays {
    #[serde(flatten)]
    pub document: DocumentIdentity,

    /// Days inside the window this document alone shows abroad.
    pub overseas_days: usize,

    /// Events of this document dated inside the window.
    pub records: usize,
}

/// Calculate overseas days between two wall-clock instants, using the
/// calendar's current day to close open stays.
pub fn calculate_overseas_days<Tz: TimeZone>(
    events: &[BorderEvent],
    from: &DateTime<Tz>,
    to: &DateTime<Tz>,
    calendar: &CalendarConfig,
) -> CalculationResult {
    calculate_overseas_days_as_of(events, from, to, calendar, calendar.today())
}

/// Like [`calculate_overseas_days`], with an explicit "today".
pub fn calculate_overseas_days_as_of<Tz: TimeZone>(
    events: &[BorderEvent],
    from: &DateTime<Tz>,
    to: &DateTime<Tz>,
    calendar: &CalendarConfig,
    today: NaiveDate,
) -> CalculationResult {
    let window = DateWindow::from_instants(from, to, calendar);
    calculate_for_window(events, window, today)
}

/// Calculate overseas days for an already-normalized window.
///
/// Events may arrive in any order. `today` closes stays with no entry.
pub fn calculate_for_window(
    events: &[BorderEvent],
    window: DateWindow,
    today: NaiveDate,
) -> CalculationResult {
    let groups = group_by_document(events);

    let mut overseas_days: HashSet<NaiveDate> = HashSet::new();
    let mut segments: Vec<AbroadSegment> = Vec::new();
    for group in groups.values() {
        fill_overseas_days(group, today, &mut overseas_days);
        segments.extend(bracket_segments(group));
    }
    let segments = merge_segments(segments, today);

    if window.is_empty() {
        tracing::debug!(?window, "empty query window");
        return CalculationResult {
            window,
            total_overseas_days: 0,
            total_records: 0,
            overseas_records: Vec::new(),
            domestic_records: Vec::new(),
            segments,
        };
    }

    let total_overseas_days = count_in_window(&overseas_days, window);
    debug_assert!(
        i64::try_from(total_overseas_days).is_ok_and(|days| days <= window.len_days()),
        "overseas days exceed window length"
    );

    let (overseas_records, domestic_records): (Vec<BorderEvent>, Vec<BorderEvent>) = events
        .iter()
        .filter(|event| window.contains(event.date))
        .cloned()
        .partition(|event| covers(&segments, event.date, today));
    let total_records = overseas_records.len() + domestic_records.len();

    tracing::debug!(
        documents = groups.len(),
        filled_days = overseas_days.len(),
        total_overseas_days,
        total_records,
        "calculated overseas days"
    );

    CalculationResult {
        window,
        total_overseas_days,
        total_records,
        overseas_records,
        domestic_records,
        segments,
    }
}

/// Recalculate overseas days for each document on its own.
///
/// Days are not unioned across documents here, so the per-document totals
/// may sum to more than the combined count when stays overlap.
pub fn calculate_per_document(
    events: &[BorderEvent],
    window: DateWindow,
    today: NaiveDate,
) -> Vec<DocumentDays> {
    group_by_document(events)
        .into_iter()
        .map(|(document, group)| {
            let mut days = HashSet::new();
            fill_overseas_days(&group, today, &mut days);
            DocumentDays {
                overseas_days: count_in_window(&days, window),
                records: group.iter().filter(|e| window.contains(e.date)).count(),
                document,
            }
        })
        .collect()
}

/// Partitions events by document identity, each partition oldest-first.
fn group_by_document(events: &[BorderEvent]) -> BTreeMap<DocumentIdentity, Vec<&BorderEvent>> {
    let mut groups: BTreeMap<DocumentIdentity, Vec<&BorderEvent>> = BTreeMap::new();
    for event in events {
        groups.entry(event.document_identity()).or_default().push(event);
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| logical_time_order(a, b));
    }
    groups
}

/// Day-fill one chronologically sorted document partition into `days`.
fn fill_overseas_days(group: &[&BorderEvent], today: NaiveDate, days: &mut HashSet<NaiveDate>) {
    let mut active_exit: Option<NaiveDate> = None;

    for event in group {
        match event.crossing {
            CrossingType::Exit => {
                if let Some(prior_exit) = active_exit {
                    // Re-exit without an entry: abroad until the new exit.
                    if let Some(day_before) = event.date.pred_opt() {
                        fill_range(days, prior_exit, day_before);
                    }
                }
                active_exit = Some(event.date);
            }
            CrossingType::Entry => {
                if let Some(exit) = active_exit.take() {
                    fill_range(days, exit.min(event.date), exit.max(event.date));
                } else {
                    tracing::debug!(id = %event.id, date = %event.date, "orphan entry ignored");
                }
            }
        }
    }

    if let Some(exit) = active_exit {
        tracing::debug!(%exit, %today, "open stay filled through today");
        fill_range(days, exit, today.max(exit));
    }
}

/// Inserts every day in `[from, to]`; nothing if `to < from`.
fn fill_range(days: &mut HashSet<NaiveDate>, from: NaiveDate, to: NaiveDate) {
    days.extend(from.iter_days().take_while(|day| *day <= to));
}

fn count_in_window(days: &HashSet<NaiveDate>, window: DateWindow) -> usize {
    window.days().filter(|day| days.contains(day)).count()
}

/// Plain exit→entry pairing for record classification.
///
/// A repeated exit replaces the pending one; there is no re-exit fill here.
fn bracket_segments(group: &[&BorderEvent]) -> Vec<AbroadSegment> {
    let mut segments = Vec::new();
    let mut pending_exit: Option<NaiveDate> = None;

    for event in group {
        if event.is_exit() {
            pending_exit = Some(event.date);
        } else if let Some(exit) = pending_exit.take() {
            segments.push(AbroadSegment::closed(exit, event.date));
        }
    }
    if let Some(exit) = pending_exit {
        segments.push(AbroadSegment::open(exit));
    }
    segments
}
