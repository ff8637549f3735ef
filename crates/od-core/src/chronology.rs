//! Logical time ordering for crossing records.
//!
//! Source feeds number records newest-first: a numerically smaller id is a
//! more recent crossing. Nothing outside this module should compare ids to
//! decide which event happened first.
//!
//! One ordering is used everywhere "chronological" is meant:
//!
//! 1. calendar date, ascending
//! 2. logical sequence from the feed id (older first)
//! 3. exit before entry

use std::cmp::Ordering;

use crate::event::BorderEvent;
use crate::types::RecordId;

/// Orders two ids oldest-first under the newest-first numbering convention.
pub fn sequence_order(a: RecordId, b: RecordId) -> Ordering {
    b.cmp(&a)
}

/// Orders events oldest-first.
pub fn logical_time_order(a: &BorderEvent, b: &BorderEvent) -> Ordering {
    a.date
        .cmp(&b.date)
        .then_with(|| sequence_order(a.id, b.id))
        .then_with(|| a.crossing.cmp(&b.crossing))
}

/// Orders events the way the source feed lists them (id ascending).
pub fn feed_order(a: &BorderEvent, b: &BorderEvent) -> Ordering {
    a.id.cmp(&b.id)
}
