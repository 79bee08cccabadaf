//! Merge busy intervals into a minimal disjoint set.
//!
//! Touching intervals (`next.start == current.end`) are merged: a zero-length
//! gap can never hold a slot, so there is no reason to keep it.

use crate::model::BusyInterval;

/// Merge overlapping or adjacent busy intervals.
///
/// Returns intervals sorted by start, pairwise disjoint and non-adjacent,
/// covering exactly the union of the input. Inverted intervals (end before
/// start) are normalized first and empty ones are dropped.
pub fn merge_intervals(intervals: &[BusyInterval]) -> Vec<BusyInterval> {
    let mut sorted: Vec<BusyInterval> = intervals
        .iter()
        .filter(|i| i.start != i.end)
        .map(|i| BusyInterval::new(i.start.min(i.end), i.start.max(i.end)))
        .collect();

    if sorted.is_empty() {
        return Vec::new();
    }

    // Sort by start time (then by end time for stability).
    sorted.sort_by_key(|i| (i.start, i.end));

    let mut merged: Vec<BusyInterval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                last.start = last.start.min(interval.start);
                last.end = last.end.max(interval.end);
                continue;
            }
        }
        merged.push(interval);
    }

    merged
}
