//! Wall-clock anchoring and grid rounding.
//!
//! Working hours are wall-clock times in the company's timezone; everything
//! after anchoring is done on UTC instants.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Place a wall-clock time on `date` in `timezone`.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant. Returns
/// `None` for times that do not exist on that date (DST spring-forward gap).
pub fn anchor(date: NaiveDate, time: NaiveTime, timezone: Tz) -> Option<DateTime<Utc>> {
    timezone
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// The calendar date of `now` in `timezone`.
pub fn local_date(now: DateTime<Utc>, timezone: Tz) -> NaiveDate {
    now.with_timezone(&timezone).date_naive()
}

/// Round `now` up to the next multiple of `step` counted from the top of the
/// local hour.
///
/// With a 30 minute step, 10:07 becomes 10:30 and 10:30:00 stays put. Steps
/// longer than an hour still count from the top of the current hour, so a 90
/// minute step turns 10:07 into 11:30.
pub fn round_up(now: DateTime<Utc>, step: Duration, timezone: Tz) -> DateTime<Utc> {
    let local = now.with_timezone(&timezone);
    let into_hour = Duration::seconds(i64::from(local.minute()) * 60 + i64::from(local.second()))
        + Duration::nanoseconds(i64::from(local.nanosecond()));
    let top_of_hour = now - into_hour;

    let step_ns = step.num_nanoseconds().unwrap_or(i64::MAX).max(1);
    let elapsed_ns = into_hour.num_nanoseconds().unwrap_or(0);
    let steps = if elapsed_ns == 0 {
        0
    } else {
        (elapsed_ns - 1) / step_ns + 1
    };

    i32::try_from(steps)
        .ok()
        .and_then(|steps| step.checked_mul(steps))
        .and_then(|offset| top_of_hour.checked_add_signed(offset))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
