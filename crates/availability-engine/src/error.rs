//! Error types for availability-engine operations.
//!
//! Engine computations never fail: "no availability" is a normal business
//! outcome. [`Unavailable`] names *why* a day produced nothing, for callers that
//! want to log or display the reason. [`EngineError`] covers decoding of the
//! request documents handed to the engine by bindings.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid request JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid datetime: {0}")]
    InvalidDateTime(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Reason a slot search came back empty.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailable {
    /// The company has no usable working hours on the requested weekday.
    #[error("closed on this day")]
    Closed,

    /// The service duration is missing, zero, or negative.
    #[error("service duration is not a positive number of minutes")]
    InvalidDuration,

    /// The day is open but every grid slot is taken or already past.
    #[error("fully booked")]
    FullyBooked,
}
