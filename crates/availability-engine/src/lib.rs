//! # availability-engine
//!
//! Appointment-slot generation and walk-in queue estimation for service
//! businesses.
//!
//! Given a company's weekly operating hours, a service duration and a
//! provider's existing commitments, the engine answers two questions:
//! which fixed-time slots can still be booked on a day, and when would
//! someone joining the walk-in queue right now likely be served.
//!
//! Every function is pure. "Now" is always passed in, so results are
//! deterministic and safe to compute concurrently for any number of providers.
//!
//! ## Modules
//!
//! - [`hours`] — weekly-hours JSON → normalized per-weekday windows
//! - [`merge`] — overlapping busy intervals → minimal disjoint set
//! - [`slots`] — bookable slots for a calendar day
//! - [`queue`] — estimated start time for a queue joiner
//! - [`conflict`] — half-open overlap checks, double-booking detection
//! - [`clock`] — timezone anchoring and grid rounding
//! - [`model`] — companies, services, bookings, queue entries, slots
//! - [`request`] — JSON request documents for bindings
//! - [`error`] — Error types

pub mod clock;
pub mod conflict;
pub mod error;
pub mod hours;
pub mod merge;
pub mod model;
pub mod queue;
pub mod request;
pub mod slots;

pub use conflict::{find_booking_conflicts, Conflict};
pub use error::{EngineError, Unavailable};
pub use hours::{parse_weekly_hours, parse_weekly_hours_str, TimeRange, WeeklyHours};
pub use merge::merge_intervals;
pub use model::{
    AvailableSlot, Booking, BusyInterval, Company, LabelStyle, ProviderId, QueueEntry,
    QueueStatus, Service,
};
pub use queue::{estimate_queue, estimate_start, try_estimate_queue, QueueEstimate};
pub use slots::{generate_slots, try_generate_slots};
