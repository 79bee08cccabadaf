//! Weekly operating-hours parsing.
//!
//! Companies store their schedule as a JSON map from weekday to a list of
//! `{ "start": "HH:mm", "end": "HH:mm" }` windows. This module normalizes that
//! loosely-typed document into a fixed seven-day [`WeeklyHours`] table.
//!
//! Parsing is fail-soft: anything unreadable simply means "closed". A single
//! malformed window is dropped without discarding the rest of its day.

use chrono::{NaiveTime, Timelike, Weekday};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

/// One open/close pair for a weekday, as wall-clock times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct TimeRange {
    #[serde(serialize_with = "serialize_hhmm")]
    pub start: NaiveTime,
    #[serde(serialize_with = "serialize_hhmm")]
    pub end: NaiveTime,
}

impl TimeRange {
    /// Build a range, rejecting empty or inverted ones.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }
}

/// Operating hours for each day of the week, indexed from Sunday.
///
/// Windows within a day are kept sorted by start time and never overlap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyHours {
    days: [Vec<TimeRange>; 7],
}

impl WeeklyHours {
    pub fn new() -> Self {
        Self::default()
    }

    /// Windows for `weekday`, earliest first. Empty means closed.
    pub fn windows(&self, weekday: Weekday) -> &[TimeRange] {
        &self.days[weekday.num_days_from_sunday() as usize]
    }

    pub fn is_closed(&self, weekday: Weekday) -> bool {
        self.windows(weekday).is_empty()
    }

    /// `true` when no day of the week has any window.
    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Vec::is_empty)
    }

    /// Add a window to `weekday`, keeping the day sorted.
    ///
    /// Overlapping windows are coalesced into one. Windows that only touch
    /// stay separate, each with its own slot grid.
    pub fn insert(&mut self, weekday: Weekday, range: TimeRange) {
        let day = &mut self.days[weekday.num_days_from_sunday() as usize];
        day.push(range);
        day.sort();
        day.dedup_by(|next, kept| {
            if next.start < kept.end {
                kept.end = kept.end.max(next.end);
                true
            } else {
                false
            }
        });
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, weekday: Weekday, range: TimeRange) -> Self {
        self.insert(weekday, range);
        self
    }
}

impl Serialize for WeeklyHours {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(7))?;
        for (index, ranges) in self.days.iter().enumerate() {
            map.serialize_entry(&index.to_string(), ranges)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WeeklyHours {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(parse_weekly_hours(&raw))
    }
}

/// Parse a weekly-hours JSON document.
///
/// Accepted shapes:
/// - an object keyed by `"0"`..`"6"` (0 = Sunday), full English weekday names or
///   three-letter abbreviations, in any case;
/// - an array of up to seven day entries starting at Sunday.
///
/// Each day entry is an array of `{start, end}` objects (a lone object is also
/// accepted). Times are `HH:mm` or `HH:mm:ss`. Unknown keys, non-object input,
/// unparseable times and ranges whose start is not before their end are all
/// dropped; the result is never an error.
pub fn parse_weekly_hours(raw: &Value) -> WeeklyHours {
    let mut hours = WeeklyHours::new();

    match raw {
        Value::Object(map) => {
            for (key, day) in map {
                match weekday_from_key(key) {
                    Some(weekday) => parse_day(&mut hours, weekday, day),
                    None => debug!(key = %key, "ignoring unknown weekday key"),
                }
            }
        }
        Value::Array(days) => {
            for (index, day) in days.iter().take(7).enumerate() {
                parse_day(&mut hours, weekday_from_index(index), day);
            }
        }
        Value::Null => {}
        other => debug!(kind = value_kind(other), "weekly hours is not an object"),
    }

    hours
}

/// Parse weekly hours from a JSON string; invalid JSON yields empty hours.
pub fn parse_weekly_hours_str(json: &str) -> WeeklyHours {
    match serde_json::from_str::<Value>(json) {
        Ok(raw) => parse_weekly_hours(&raw),
        Err(e) => {
            debug!(error = %e, "weekly hours is not valid JSON");
            WeeklyHours::new()
        }
    }
}

/// Parse an `HH:mm` or `HH:mm:ss` wall-clock time.
pub fn parse_time_of_day(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

fn parse_day(hours: &mut WeeklyHours, weekday: Weekday, day: &Value) {
    let entries: &[Value] = match day {
        Value::Array(entries) => entries,
        Value::Object(_) => std::slice::from_ref(day),
        _ => return,
    };

    for entry in entries {
        match parse_range(entry) {
            Some(range) => hours.insert(weekday, range),
            None => debug!(?weekday, entry = %entry, "dropping malformed working-hours range"),
        }
    }
}

fn parse_range(entry: &Value) -> Option<TimeRange> {
    let start = parse_time_of_day(entry.get("start")?.as_str()?)?;
    let end = parse_time_of_day(entry.get("end")?.as_str()?)?;
    TimeRange::new(start, end)
}

fn weekday_from_key(key: &str) -> Option<Weekday> {
    let key = key.trim();
    if let Ok(index) = key.parse::<usize>() {
        return (index < 7).then(|| weekday_from_index(index));
    }
    match key.to_ascii_lowercase().as_str() {
        "sunday" | "sun" => Some(Weekday::Sun),
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        _ => None,
    }
}

fn weekday_from_index(index: usize) -> Weekday {
    match index {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn serialize_hhmm<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    let fmt = if time.second() == 0 { "%H:%M" } else { "%H:%M:%S" };
    serializer.collect_str(&time.format(fmt))
}
