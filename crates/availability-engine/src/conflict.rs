//! Overlap detection between half-open time ranges.
//!
//! Two ranges overlap when `a.start < b.end && a.end > b.start`. A range that
//! ends exactly when another starts is NOT a conflict.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{Booking, BusyInterval};

/// A committed booking that clashes with a proposed one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub booking: Booking,
    pub overlap_minutes: i64,
}

/// Half-open overlap test for `[a_start, a_end)` against `[b_start, b_end)`.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// `true` when `[start, end)` overlaps any of `busy`.
pub fn overlaps_any(start: DateTime<Utc>, end: DateTime<Utc>, busy: &[BusyInterval]) -> bool {
    busy.iter().any(|b| overlaps(start, end, b.start, b.end))
}

/// Check a proposed booking against a provider's committed bookings.
///
/// Only bookings for the same provider are considered. Each clash is
/// reported with its overlap `min(ends) - max(starts)` in minutes.
pub fn find_booking_conflicts(proposed: &Booking, existing: &[Booking]) -> Vec<Conflict> {
    existing
        .iter()
        .filter(|b| b.provider_id == proposed.provider_id)
        .filter(|b| overlaps(proposed.start_time, proposed.end_time, b.start_time, b.end_time))
        .map(|b| {
            let overlap_start = proposed.start_time.max(b.start_time);
            let overlap_end = proposed.end_time.min(b.end_time);
            Conflict {
                booking: b.clone(),
                overlap_minutes: (overlap_end - overlap_start).num_minutes(),
            }
        })
        .collect()
}
