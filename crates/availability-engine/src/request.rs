//! JSON request documents for callers that cross a serialization boundary
//! (the CLI and the WASM bindings).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conflict::{find_booking_conflicts, Conflict};
use crate::error::{EngineError, Result};
use crate::model::{AvailableSlot, Booking, Company, ProviderId, QueueEntry, Service};
use crate::queue::{estimate_queue, QueueEstimate};
use crate::slots::generate_slots;

/// Everything needed to list a day's bookable slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRequest {
    pub company: Company,
    pub service: Service,
    pub provider: ProviderId,
    pub date: NaiveDate,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

impl SlotRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn generate(&self, now: DateTime<Utc>) -> Vec<AvailableSlot> {
        generate_slots(
            &self.company,
            &self.service,
            &self.provider,
            self.date,
            &self.bookings,
            now,
        )
    }
}

/// Everything needed to estimate a queue joiner's start time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueRequest {
    pub company: Company,
    pub service: Service,
    pub provider: ProviderId,
    #[serde(default)]
    pub bookings: Vec<Booking>,
    /// Active entries in service order.
    #[serde(default)]
    pub queue: Vec<QueueEntry>,
}

impl QueueRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn estimate(&self, now: DateTime<Utc>) -> Option<QueueEstimate> {
        estimate_queue(
            &self.company,
            &self.service,
            &self.provider,
            &self.bookings,
            &self.queue,
            now,
        )
    }
}

/// A booking about to be stored, plus the provider's existing bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictRequest {
    pub proposed: Booking,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

impl ConflictRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn conflicts(&self) -> Vec<Conflict> {
        find_booking_conflicts(&self.proposed, &self.bookings)
    }
}

/// Parse an ISO 8601 instant.
///
/// Accepts RFC 3339 with an offset (e.g. "2026-03-16T10:07:00+01:00") or a naive
/// "2026-03-16T10:07:00", which is taken as UTC.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| EngineError::InvalidDateTime(format!("'{}': {}", s, e)))
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| EngineError::InvalidDate(format!("'{}': {}", s, e)))
}
