//! Domain values consumed and produced by the engine.
//!
//! Field names serialize in camelCase to match the documents the booking front
//! end keeps in its data store.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::hours::WeeklyHours;

/// A business that offers services and publishes weekly operating hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Timezone the working hours are expressed in.
    #[serde(default = "default_timezone", with = "tz_name")]
    pub timezone: Tz,
    #[serde(default)]
    pub working_hours: WeeklyHours,
    #[serde(default)]
    pub label_style: LabelStyle,
}

impl Company {
    pub fn new(working_hours: WeeklyHours) -> Self {
        Self {
            id: None,
            name: None,
            timezone: Tz::UTC,
            working_hours,
            label_style: LabelStyle::default(),
        }
    }

    /// Set the timezone from an IANA name such as `"Europe/Madrid"`.
    pub fn with_timezone(mut self, timezone: &str) -> Result<Self> {
        self.timezone = parse_timezone(timezone)?;
        Ok(self)
    }

    pub fn with_label_style(mut self, label_style: LabelStyle) -> Self {
        self.label_style = label_style;
        self
    }
}

/// A bookable service. Its duration is also the slot grid step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Decoded leniently: anything other than a JSON integer reads as missing.
    #[serde(default, deserialize_with = "lenient_minutes")]
    pub estimated_duration_minutes: Option<i64>,
}

impl Service {
    pub fn with_duration(minutes: i64) -> Self {
        Self {
            estimated_duration_minutes: Some(minutes),
            ..Self::default()
        }
    }

    /// The slot length, or `None` when the configured duration is unusable.
    pub fn duration(&self) -> Option<Duration> {
        self.estimated_duration_minutes
            .filter(|&minutes| minutes > 0)
            .and_then(Duration::try_minutes)
    }
}

/// Opaque identity of the person delivering a service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(pub String);

impl From<&str> for ProviderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProviderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A confirmed appointment occupying `[start_time, end_time)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub provider_id: ProviderId,
}

impl Booking {
    pub fn new(
        provider_id: impl Into<ProviderId>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            start_time,
            end_time,
            provider_id: provider_id.into(),
        }
    }

    pub fn interval(&self) -> BusyInterval {
        BusyInterval {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

/// Lifecycle state of a walk-in queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueStatus {
    Waiting,
    Serving,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl QueueStatus {
    /// Waiting and serving entries still occupy the provider.
    pub fn is_active(self) -> bool {
        matches!(self, QueueStatus::Waiting | QueueStatus::Serving)
    }
}

/// A walk-in customer. It has no scheduled time of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    pub provider_id: ProviderId,
    pub status: QueueStatus,
}

impl QueueEntry {
    pub fn new(provider_id: impl Into<ProviderId>, status: QueueStatus) -> Self {
        Self {
            provider_id: provider_id.into(),
            status,
        }
    }
}

/// A half-open span `[start, end)` during which a provider is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }
}

/// A bookable slot as shown to the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub display_label: String,
}

/// How slot start times are rendered in `display_label`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelStyle {
    /// `14:30`
    #[default]
    #[serde(rename = "24h")]
    TwentyFourHour,
    /// `2:30 PM`
    #[serde(rename = "12h")]
    TwelveHour,
}

impl LabelStyle {
    pub fn format(self, at: DateTime<Utc>, timezone: Tz) -> String {
        let local = at.with_timezone(&timezone);
        match self {
            LabelStyle::TwentyFourHour => local.format("%H:%M").to_string(),
            LabelStyle::TwelveHour => local.format("%-I:%M %p").to_string(),
        }
    }
}

/// Resolve an IANA timezone name.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| EngineError::InvalidTimezone(name.to_string()))
}

fn lenient_minutes<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<i64>, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    let minutes = raw.as_i64();
    if minutes.is_none() && !raw.is_null() {
        debug!(value = %raw, "ignoring non-integer service duration");
    }
    Ok(minutes)
}

fn default_timezone() -> Tz {
    Tz::UTC
}

mod tz_name {
    use chrono_tz::Tz;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(tz: &Tz, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(tz.name())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Tz, D::Error> {
        let name = String::deserialize(deserializer)?;
        super::parse_timezone(&name).map_err(serde::de::Error::custom)
    }
}
