//! Open/closed checks against a weekly schedule.

use std::fmt;

use crate::domain::{TimeOfDay, WeekInstant};

use super::hours::WeeklySchedule;

/// Whether a landmark with `schedule` is open at `instant`.
///
/// The day's opening interval is inclusive at both ends, so a landmark that
/// closes at 17:00 still counts as open at 17:00. Closed, missing, and
/// malformed days are never open.
///
/// # Examples
///
/// ```
/// use chrono::Weekday;
/// use landmark_server::domain::{TimeOfDay, WeekInstant};
/// use landmark_server::schedule::{DayHours, WeeklySchedule, is_open_at};
///
/// let schedule = WeeklySchedule::new().with_day(Weekday::Wed, DayHours::open("09:00", "17:00"));
/// let at = |s: &str| WeekInstant::new(Weekday::Wed, TimeOfDay::parse_hhmm(s).unwrap());
///
/// assert!(is_open_at(&schedule, at("10:00")));
/// assert!(is_open_at(&schedule, at("17:00")));
/// assert!(!is_open_at(&schedule, at("17:01")));
/// ```
pub fn is_open_at(schedule: &WeeklySchedule, instant: WeekInstant) -> bool {
    schedule
        .interval_on(instant.day())
        .is_some_and(|interval| interval.contains(instant.time()))
}

/// Short status line for a landmark card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenStatus {
    /// The landmark has no opening hours on record.
    Unavailable,
    /// Today is closed (or today's hours are incomplete).
    ClosedToday,
    /// Open now, closing at the given time.
    OpenUntil(TimeOfDay),
    /// Open today, but not at this moment.
    ClosedNow,
}

impl OpenStatus {
    /// Whether this status means the landmark is open.
    pub fn is_open(&self) -> bool {
        matches!(self, OpenStatus::OpenUntil(_))
    }
}

impl fmt::Display for OpenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenStatus::Unavailable => f.write_str("Opening hours unavailable"),
            OpenStatus::ClosedToday => f.write_str("Closed today"),
            OpenStatus::OpenUntil(close) => write!(f, "Open now until {close}"),
            OpenStatus::ClosedNow => f.write_str("Closed now"),
        }
    }
}

/// Status of a landmark at `instant`.
///
/// Agrees with [`is_open_at`]: the status is `OpenUntil` exactly when
/// `is_open_at` returns true.
pub fn open_status(schedule: Option<&WeeklySchedule>, instant: WeekInstant) -> OpenStatus {
    let Some(schedule) = schedule else {
        return OpenStatus::Unavailable;
    };

    match schedule.interval_on(instant.day()) {
        None => OpenStatus::ClosedToday,
        Some(interval) if interval.contains(instant.time()) => {
            OpenStatus::OpenUntil(interval.close)
        }
        Some(_) => OpenStatus::ClosedNow,
    }
}
