//! Bookable slot generation for a single calendar day.
//!
//! Each working-hours window is walked on a fixed grid of the service's
//! duration. A grid position is offered when it has not ended yet and does not
//! overlap a confirmed booking of the provider. Slots never start off-grid to
//! fill a gap.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use tracing::{debug, trace};

use crate::clock;
use crate::conflict::overlaps_any;
use crate::error::Unavailable;
use crate::model::{AvailableSlot, Booking, BusyInterval, Company, ProviderId, Service};

/// A working-hours window anchored to a concrete date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// List the bookable slots for `provider` on `target_date`.
///
/// Returns an empty list when the company is closed that day, the service
/// has no usable duration, or nothing is free. Use [`try_generate_slots`] to
/// tell those cases apart.
pub fn generate_slots(
    company: &Company,
    service: &Service,
    provider: &ProviderId,
    target_date: NaiveDate,
    bookings: &[Booking],
    now: DateTime<Utc>,
) -> Vec<AvailableSlot> {
    try_generate_slots(company, service, provider, target_date, bookings, now).unwrap_or_default()
}

/// Like [`generate_slots`], but reports why no slot is available.
///
/// `now` is the reference instant: slots that end at or before it are never
/// offered, and on the current day the first slot of a window that has
/// already opened is rounded up from `now`.
pub fn try_generate_slots(
    company: &Company,
    service: &Service,
    provider: &ProviderId,
    target_date: NaiveDate,
    bookings: &[Booking],
    now: DateTime<Utc>,
) -> Result<Vec<AvailableSlot>, Unavailable> {
    let windows = anchored_windows(company, target_date);
    if windows.is_empty() {
        debug!(date = %target_date, "company closed");
        return Err(Unavailable::Closed);
    }

    let Some(duration) = service.duration() else {
        debug!(service = ?service.id, "invalid service duration");
        return Err(Unavailable::InvalidDuration);
    };

    let busy: Vec<BusyInterval> = bookings
        .iter()
        .filter(|b| &b.provider_id == provider)
        .map(Booking::interval)
        .collect();

    let mut slots = Vec::new();
    for window in &windows {
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
            if end > now && !overlaps_any(start, end, &busy) {
                slots.push(AvailableSlot {
                    start,
                    end,
                    display_label: company.label_style.format(start, company.timezone),
                });
            }
            start = end;
        }
    }

    if slots.is_empty() {
        debug!(date = %target_date, provider = %provider, "fully booked");
        return Err(Unavailable::FullyBooked);
    }
    Ok(slots)
}

/// The company's windows for the weekday of `date`, as UTC instants.
///
/// Windows whose wall-clock bounds do not exist on that date are skipped.
pub(crate) fn anchored_windows(company: &Company, date: NaiveDate) -> Vec<Window> {
    company
        .working_hours
        .windows(date.weekday())
        .iter()
        .filter_map(|range| {
            let start = clock::anchor(date, range.start, company.timezone);
            let end = clock::anchor(date, range.end, company.timezone);
            match (start, end) {
                (Some(start), Some(end)) if start < end => Some(Window { start, end }),
                _ => {
                    debug!(%date, ?range, "window does not exist on this date");
                    None
                }
            }
        })
        .collect()
}

/// Where scanning a window begins: its opening time, or `now` rounded up to
/// the grid when the window has already opened.
pub(crate) fn first_candidate(
    window: &Window,
    now: DateTime<Utc>,
    duration: Duration,
    company: &Company,
) -> DateTime<Utc> {
    if window.start < now {
        clock::round_up(now, duration, company.timezone)
    } else {
        window.start
    }
}
