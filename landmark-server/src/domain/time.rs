//! Wall-clock time handling for opening hours.
//!
//! Landmark records carry times as "HH:MM" strings. This module normalizes
//! them to minutes since midnight and pairs them with a weekday to form the
//! instant that opening-hours checks are evaluated against.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, Timelike, Weekday};

/// Minutes in a day.
const MINUTES_PER_DAY: u16 = 24 * 60;

/// Days of the week in display order, starting on Monday.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A wall-clock time of day with minute precision.
///
/// Stored as minutes since midnight (0-1439), so comparisons are plain
/// integer comparisons.
///
/// # Examples
///
/// ```
/// use landmark_server::domain::TimeOfDay;
///
/// let time = TimeOfDay::parse_hhmm("14:30").unwrap();
/// assert_eq!(time.minutes(), 870);
/// assert_eq!(time.to_string(), "14:30");
/// assert_eq!(time.to_12_hour(), "2:30 PM");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    /// Midnight at the start of the day.
    pub const MIDNIGHT: Self = Self { minutes: 0 };

    /// Create a time from hour (0-23) and minute (0-59) components.
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, TimeError> {
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        Ok(Self {
            minutes: (hour * 60 + minute) as u16,
        })
    }

    /// Create a time from minutes since midnight.
    ///
    /// Returns `None` if `minutes` is 1440 or more.
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self { minutes })
    }

    /// Parse a time from "HH:MM" format.
    ///
    /// A single-digit hour ("9:00") is accepted since hand-entered records
    /// often omit the leading zero. Minutes must always have two digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use landmark_server::domain::TimeOfDay;
    ///
    /// assert!(TimeOfDay::parse_hhmm("00:00").is_ok());
    /// assert!(TimeOfDay::parse_hhmm("23:59").is_ok());
    /// assert!(TimeOfDay::parse_hhmm("9:00").is_ok());
    ///
    /// assert!(TimeOfDay::parse_hhmm("0900").is_err());
    /// assert!(TimeOfDay::parse_hhmm("09:0").is_err());
    /// assert!(TimeOfDay::parse_hhmm("24:00").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        let (hour, minute) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| TimeError::new("expected HH:MM format"))?;

        if hour.is_empty() || hour.len() > 2 {
            return Err(TimeError::new("expected one or two hour digits"));
        }
        if minute.len() != 2 {
            return Err(TimeError::new("expected two minute digits"));
        }

        let hour = parse_digits(hour).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minute =
            parse_digits(minute).ok_or_else(|| TimeError::new("invalid minute digits"))?;

        Self::from_hm(hour, minute)
    }

    /// Returns minutes since midnight (0-1439).
    pub fn minutes(&self) -> u16 {
        self.minutes
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        u32::from(self.minutes / 60)
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        u32::from(self.minutes % 60)
    }

    /// Format as a 12-hour clock string, e.g. "9:05 AM".
    ///
    /// Both midnight and noon render with hour 12.
    pub fn to_12_hour(&self) -> String {
        let hour = self.hour();
        let period = if hour >= 12 { "PM" } else { "AM" };
        let hour12 = match hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:{:02} {}", hour12, self.minute(), period)
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hhmm(s)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl fmt::Debug for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeOfDay({})", self)
    }
}

/// Parse an all-ASCII-digit string.
fn parse_digits(s: &str) -> Option<u32> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// A point in the week: a weekday and a time of day on it.
///
/// This is what opening hours are evaluated against. Callers supply it
/// explicitly so checks stay deterministic; [`WeekInstant::now`] reads the
/// device's local clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekInstant {
    day: Weekday,
    time: TimeOfDay,
}

impl WeekInstant {
    /// Create an instant from its components.
    pub fn new(day: Weekday, time: TimeOfDay) -> Self {
        Self { day, time }
    }

    /// Take the weekday and minute of a chrono date-time, dropping seconds.
    pub fn from_datetime<T: Datelike + Timelike>(dt: &T) -> Self {
        let minutes = (dt.hour() * 60 + dt.minute()) as u16;
        Self {
            day: dt.weekday(),
            time: TimeOfDay { minutes },
        }
    }

    /// The current instant on the local clock.
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    /// Returns the weekday.
    pub fn day(&self) -> Weekday {
        self.day
    }

    /// Returns the time of day.
    pub fn time(&self) -> TimeOfDay {
        self.time
    }

    /// Returns minutes since midnight.
    pub fn minutes(&self) -> u16 {
        self.time.minutes
    }
}

/// Lowercase key used for a weekday in schedule records ("monday").
pub fn day_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Capitalized weekday name for display ("Monday").
pub fn day_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
