//! Walk-in queue start-time estimation.
//!
//! Queue entries carry no times of their own. Each active entry is projected
//! onto the provider's day back to back, one service duration each, starting
//! at `now` rounded up to the grid. Those projections are merged with the
//! provider's upcoming bookings, and today's working-hours windows are scanned
//! on the same grid as slot generation for the first free position.
//!
//! The projection assumes strict first-come-first-served order and a fixed
//! duration per person. The horizon is the current day only: a queue that
//! runs past closing time yields no estimate rather than rolling over.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, trace};

use crate::clock;
use crate::conflict::overlaps_any;
use crate::error::Unavailable;
use crate::merge::merge_intervals;
use crate::model::{Booking, BusyInterval, Company, ProviderId, QueueEntry, Service};
use crate::slots::{anchored_windows, first_candidate};

/// Advisory start-time estimate for someone joining the queue now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEstimate {
    pub estimated_start: DateTime<Utc>,
    /// Active (waiting or serving) entries for the provider.
    pub people_ahead: usize,
    /// Whole minutes from `now` until `estimated_start`.
    pub wait_minutes: i64,
}

/// Estimated start time for a new queue joiner, or `None` if the provider
/// has no free grid position left today.
///
/// `queue` must be in service order (typically queue position). Entries for
/// other providers and inactive entries are ignored.
pub fn estimate_start(
    company: &Company,
    service: &Service,
    provider: &ProviderId,
    bookings: &[Booking],
    queue: &[QueueEntry],
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    estimate_queue(company, service, provider, bookings, queue, now).map(|e| e.estimated_start)
}

/// [`estimate_start`] with queue length and wait time.
pub fn estimate_queue(
    company: &Company,
    service: &Service,
    provider: &ProviderId,
    bookings: &[Booking],
    queue: &[QueueEntry],
    now: DateTime<Utc>,
) -> Option<QueueEstimate> {
    try_estimate_queue(company, service, provider, bookings, queue, now).ok()
}

/// Like [`estimate_queue`], but reports why no estimate exists.
pub fn try_estimate_queue(
    company: &Company,
    service: &Service,
    provider: &ProviderId,
    bookings: &[Booking],
    queue: &[QueueEntry],
    now: DateTime<Utc>,
) -> Result<QueueEstimate, Unavailable> {
    let today = clock::local_date(now, company.timezone);
    let windows = anchored_windows(company, today);
    if windows.is_empty() {
        debug!(date = %today, "company closed today");
        return Err(Unavailable::Closed);
    }

    let Some(duration) = service.duration() else {
        debug!(service = ?service.id, "invalid service duration");
        return Err(Unavailable::InvalidDuration);
    };

    let active: Vec<&QueueEntry> = queue
        .iter()
        .filter(|e| &e.provider_id == provider && e.status.is_active())
        .collect();

    let mut busy: Vec<BusyInterval> = bookings
        .iter()
        .filter(|b| &b.provider_id == provider && b.end_time > now)
        .map(Booking::interval)
        .collect();
    busy.extend(project_queue(active.len(), now, duration, company));
    let busy = merge_intervals(&busy);

    let found = windows.iter().find_map(|window| {
        let mut start = first_candidate(window, now, duration, company);
        trace!(
            window_start = %window.start,
            window_end = %window.end,
            first = %start,
            "scanning window"
        );

        while let Some(end) = start
            .checked_add_signed(duration)
            .filter(|end| *end <= window.end)
        {
            if !overlaps_any(start, end, &busy) {
                return Some(start);
            }
            start = end;
        }
        None
    });

    let Some(mut estimated_start) = found else {
        debug!(
            date = %today,
            provider = %provider,
            queued = active.len(),
            "no free position left today"
        );
        return Err(Unavailable::FullyBooked);
    };

    if estimated_start < now {
        estimated_start = now
            .checked_add_signed(duration)
            .map(|later| clock::round_up(later, duration, company.timezone))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
    }

    Ok(QueueEstimate {
        estimated_start,
        people_ahead: active.len(),
        wait_minutes: (estimated_start - now).num_minutes().max(0),
    })
}

/// Back-to-back occupancy for `count` queued people starting at the next
/// grid boundary after `now`.
fn project_queue(
    count: usize,
    now: DateTime<Utc>,
    duration: Duration,
    company: &Company,
) -> Vec<BusyInterval> {
    let mut start = clock::round_up(now, duration, company.timezone);
    let mut projected = Vec::with_capacity(count);
    for _ in 0..count {
        let Some(end) = start.checked_add_signed(duration) else {
            break;
        };
        projected.push(BusyInterval::new(start, end));
        start = end;
    }
    projected
}
