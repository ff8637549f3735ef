//! Core logic for overseas-day counting.
//!
//! This crate contains the fundamental types and logic for:
//! - Matching: repairing entry documents and flagging same-day anomalies
//! - Overseas: turning crossings into abroad days and counting them in a window
//! - Calendar: projecting instants onto one fixed-offset calendar
//!
//! Every computation is pure and re-derived from the full input on each call.

mod calendar;
pub mod chronology;
mod event;
mod matching;
mod overseas;
mod segment;
mod types;

pub use calendar::{CalendarConfig, DEFAULT_UTC_OFFSET_HOURS, DateWindow};
pub use event::{BorderEvent, CrossingType};
pub use matching::{IssueKind, MatchingResult, Severity, ValidationIssue, correct_document_matching};
pub use overseas::{
    CalculationResult, DocumentDays, calculate_for_window, calculate_overseas_days,
    calculate_overseas_days_as_of, calculate_per_document,
};
pub use segment::{AbroadSegment, merge_segments};
pub use types::{DocumentIdentity, RecordId, ValidationError};
