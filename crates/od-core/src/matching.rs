//! Document-matching correction.
//!
//! Under the rule "you enter with whatever document you used to exit", every
//! entry should carry the document identity of the exit it pairs with. Logs
//! never hold two consecutive exits or entries for one trip, so pairing is
//! plain bracket matching over the merged chronological stream: the nearest
//! unmatched exit closes with the next entry.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::chronology::{feed_order, logical_time_order, sequence_order};
use crate::event::{BorderEvent, CrossingType};
use crate::types::{DocumentIdentity, RecordId};

/// A same-day group is reported once it exceeds one round trip.
const SAME_DAY_LIMIT: usize = 2;

/// Category of a detected anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueKind {
    /// An entry carried a different document than its paired exit.
    DocumentMismatch,
    /// More than one round trip recorded for one document on one day.
    SameDayMultiple,
}

impl IssueKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DocumentMismatch => "documentMismatch",
            Self::SameDayMultiple => "sameDayMultiple",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Info,
    Warning,
}

impl Severity {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

/// A reported data anomaly. Never blocks the day count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub severity: Severity,
    pub record_ids: Vec<RecordId>,
    pub message: String,
    pub suggestion: String,
}

/// Output of the correction pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingResult {
    /// Input events with entry documents aligned, in feed order.
    pub corrected_events: Vec<BorderEvent>,
    pub issues: Vec<ValidationIssue>,
    pub original_count: usize,
    /// Number of entries whose document was rewritten.
    pub corrected_count: usize,
}

/// Repair entry documents so they match their paired exits, and flag
/// same-day anomalies.
///
/// Accepts events in any order. Orphan entries pass through unchanged.
pub fn correct_document_matching(events: &[BorderEvent]) -> MatchingResult {
    let mut corrected: Vec<BorderEvent> = events.to_vec();
    let mut issues = Vec::new();
    let mut corrected_count = 0;

    let mut order: Vec<usize> = (0..corrected.len()).collect();
    order.sort_by(|&a, &b| logical_time_order(&corrected[a], &corrected[b]));

    let mut open_exits: Vec<usize> = Vec::new();
    for idx in order {
        match corrected[idx].crossing {
            CrossingType::Exit => open_exits.push(idx),
            CrossingType::Entry => {
                let Some(exit_idx) = open_exits.pop() else {
                    tracing::debug!(id = %corrected[idx].id, "entry without a preceding exit");
                    continue;
                };
                let exit_document = corrected[exit_idx].document_identity();
                if !corrected[idx].has_document(&exit_document) {
                    issues.push(mismatch_issue(&corrected[exit_idx], &corrected[idx]));
                    corrected[idx] = corrected[idx].with_document(&exit_document);
                    corrected_count += 1;
                }
            }
        }
    }

    for exit_idx in &open_exits {
        tracing::debug!(id = %corrected[*exit_idx].id, "exit without a matching entry");
    }

    issues.extend(same_day_issues(&corrected));

    corrected.sort_by(feed_order);

    tracing::info!(
        original_count = events.len(),
        corrected_count,
        issues = issues.len(),
        "document matching complete"
    );

    MatchingResult {
        corrected_events: corrected,
        issues,
        original_count: events.len(),
        corrected_count,
    }
}

fn mismatch_issue(exit: &BorderEvent, entry: &BorderEvent) -> ValidationIssue {
    let adopted = exit.document_identity();
    ValidationIssue {
        kind: IssueKind::DocumentMismatch,
        severity: Severity::Info,
        record_ids: vec![exit.id, entry.id],
        message: format!(
            "Entry record {} was logged with {} but pairs with exit record {} on {}; \
             adopted {}",
            entry.id,
            entry.document_identity(),
            exit.id,
            exit.date,
            adopted.name
        ),
        suggestion: format!(
            "The entry now uses {adopted}. Check the source log if a different document was \
             actually presented."
        ),
    }
}

/// Flags any document with more than two crossings on a single day.
fn same_day_issues(events: &[BorderEvent]) -> Vec<ValidationIssue> {
    let mut by_day: BTreeMap<(NaiveDate, DocumentIdentity), Vec<RecordId>> = BTreeMap::new();
    for event in events {
        by_day
            .entry((event.date, event.document_identity()))
            .or_default()
            .push(event.id);
    }

    by_day
        .into_iter()
        .filter(|(_, ids)| ids.len() > SAME_DAY_LIMIT)
        .map(|((date, document), mut record_ids)| {
            record_ids.sort_by(|a, b| sequence_order(*a, *b));
            ValidationIssue {
                kind: IssueKind::SameDayMultiple,
                severity: Severity::Info,
                message: format!(
                    "{} crossings recorded on {date} with {document}",
                    record_ids.len()
                ),
                suggestion: "Each day abroad is counted once; check for duplicated records if \
                             these trips did not all happen."
                    .to_string(),
                record_ids,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn passport() -> DocumentIdentity {
        DocumentIdentity::new("Passport", "P001")
    }

    fn permit() -> DocumentIdentity {
        DocumentIdentity::new("HKM-Permit", "H001")
    }

    fn exit(id: u64, on: NaiveDate, doc: &DocumentIdentity) -> BorderEvent {
        BorderEvent::new(RecordId::new(id), on, CrossingType::Exit, doc)
    }

    fn entry(id: u64, on: NaiveDate, doc: &DocumentIdentity) -> BorderEvent {
        BorderEvent::new(RecordId::new(id), on, CrossingType::Entry, doc)
    }

    fn kinds(result: &MatchingResult) -> Vec<IssueKind> {
        result.issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn test_entry_adopts_exit_document() {
        let events = vec![exit(2, date(1, 1), &passport()), entry(1, date(1, 5), &permit())];

        let result = correct_document_matching(&events);

        assert_eq!(result.corrected_count, 1);
        assert_eq!(result.original_count, 2);
        assert_eq!(kinds(&result), vec![IssueKind::DocumentMismatch]);

        let issue = &result.issues[0];
        assert_eq!(issue.severity, Severity::Info);
        assert_eq!(issue.record_ids, vec![RecordId::new(2), RecordId::new(1)]);
        assert!(issue.message.contains("2024-01-01"));
        assert!(issue.message.contains("Passport"));

        let corrected_entry = &result.corrected_events[0];
        assert_eq!(corrected_entry.id, RecordId::new(1));
        assert!(corrected_entry.has_document(&passport()));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let events = vec![exit(2, date(1, 1), &passport()), entry(1, date(1, 5), &permit())];

        let _ = correct_document_matching(&events);

        assert!(events[1].has_document(&permit()));
    }

    #[test]
    fn test_matching_documents_are_untouched() {
        let events = vec![exit(2, date(1, 1), &passport()), entry(1, date(1, 5), &passport())];

        let result = correct_document_matching(&events);

        assert_eq!(result.corrected_count, 0);
        assert!(result.issues.is_empty());
        assert_eq!(result.corrected_events, {
            let mut sorted = events.clone();
            sorted.sort_by(feed_order);
            sorted
        });
    }

    #[test]
    fn test_orphan_entry_passes_through() {
        let events = vec![entry(1, date(1, 5), &permit())];

        let result = correct_document_matching(&events);

        assert_eq!(result.corrected_count, 0);
        assert!(result.issues.is_empty());
        assert_eq!(result.corrected_events, events);
    }

    #[test]
    fn test_nearest_unmatched_exit_pairs_first() {
        // Exit (passport), exit (permit), entry, entry: the first entry closes
        // the permit exit, the second closes the passport exit.
        let events = vec![
            exit(4, date(1, 1), &passport()),
            exit(3, date(1, 2), &permit()),
            entry(2, date(1, 3), &passport()),
            entry(1, date(1, 4), &permit()),
        ];

        let result = correct_document_matching(&events);

        assert_eq!(result.corrected_count, 2);
        let by_id: BTreeMap<u64, &BorderEvent> = result
            .corrected_events
            .iter()
            .map(|e| (e.id.value(), e))
            .collect();
        assert!(by_id[&2].has_document(&permit()));
        assert!(by_id[&1].has_document(&passport()));
    }

    #[test]
    fn test_same_day_round_trip_pairs_within_day() {
        let events = vec![
            entry(1, date(3, 1), &permit()),
            exit(2, date(3, 1), &passport()),
        ];

        let result = correct_document_matching(&events);

        assert_eq!(result.corrected_count, 1);
        assert!(result.corrected_events[0].has_document(&passport()));
    }

    #[test]
    fn test_four_same_day_events_flagged_once() {
        let doc = passport();
        let events = vec![
            exit(4, date(1, 1), &doc),
            entry(3, date(1, 1), &doc),
            exit(2, date(1, 1), &doc),
            entry(1, date(1, 1), &doc),
        ];

        let result = correct_document_matching(&events);

        assert_eq!(kinds(&result), vec![IssueKind::SameDayMultiple]);
        let issue = &result.issues[0];
        assert_eq!(issue.severity, Severity::Info);
        let mut ids: Vec<u64> = issue.record_ids.iter().map(|id| id.value()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_two_same_day_events_are_not_flagged() {
        let doc = passport();
        let events = vec![exit(2, date(1, 1), &doc), entry(1, date(1, 1), &doc)];

        let result = correct_document_matching(&events);

        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_same_day_check_is_per_document() {
        let events = vec![
            exit(4, date(1, 1), &passport()),
            entry(3, date(1, 1), &passport()),
            exit(2, date(1, 1), &permit()),
            entry(1, date(1, 1), &permit()),
        ];

        let result = correct_document_matching(&events);

        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_output_is_feed_ordered() {
        let events = vec![
            exit(3, date(1, 1), &passport()),
            entry(1, date(2, 1), &passport()),
            entry(2, date(1, 10), &passport()),
        ];

        let result = correct_document_matching(&events);

        let ids: Vec<u64> = result.corrected_events.iter().map(|e| e.id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_correction_is_idempotent() {
        let events = vec![
            exit(6, date(1, 1), &passport()),
            entry(5, date(1, 5), &permit()),
            exit(4, date(2, 1), &permit()),
            entry(3, date(2, 3), &passport()),
            exit(2, date(3, 1), &passport()),
            entry(1, date(3, 1), &passport()),
        ];

        let first = correct_document_matching(&events);
        let second = correct_document_matching(&first.corrected_events);

        assert_eq!(first.corrected_count, 2);
        assert_eq!(second.corrected_count, 0);
        assert!(
            !second
                .issues
                .iter()
                .any(|i| i.kind == IssueKind::DocumentMismatch)
        );
        assert_eq!(second.corrected_events, first.corrected_events);
    }

    #[test]
    fn test_issue_serializes_for_display() {
        let events = vec![exit(2, date(1, 1), &passport()), entry(1, date(1, 5), &permit())];

        let result = correct_document_matching(&events);
        let json = serde_json::to_value(&result.issues[0]).unwrap();

        assert_eq!(json["type"], "documentMismatch");
        assert_eq!(json["severity"], "info");
        assert_eq!(json["recordIds"], serde_json::json!([2, 1]));
    }

    /// Record ids are unique per feed; dates are drawn independently of them.
    fn arb_events() -> impl Strategy<Value = Vec<BorderEvent>> {
        prop::collection::vec((0u64..120, any::<bool>(), 0usize..3), 0..40).prop_map(|legs| {
            let documents = [passport(), permit(), DocumentIdentity::default()];
            legs.into_iter()
                .zip(1u64..)
                .map(|((offset, is_exit, doc), id)| {
                    let crossing = if is_exit {
                        CrossingType::Exit
                    } else {
                        CrossingType::Entry
                    };
                    BorderEvent::new(
                        RecordId::new(id),
                        date(1, 1) + chrono::Days::new(offset),
                        crossing,
                        &documents[doc],
                    )
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_correction_is_fixed_point(
            events in arb_events(),
        ) {
            let first = correct_document_matching(&events);
            let second = correct_document_matching(&first.corrected_events);

            prop_assert_eq!(second.corrected_count, 0);
            prop_assert!(
                !second
                    .issues
                    .iter()
                    .any(|i| i.kind == IssueKind::DocumentMismatch)
            );
            prop_assert_eq!(&second.corrected_events, &first.corrected_events);
        }
    }
}
