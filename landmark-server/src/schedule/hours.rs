//! Weekly opening-hours records.
//!
//! These map directly to the `openingHours` object stored on each landmark
//! document. Times stay as raw strings at this boundary so that a single bad
//! entry degrades that day to "closed" rather than rejecting the landmark.

use std::collections::HashMap;

use chrono::Weekday;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::domain::{TimeOfDay, day_key};

/// Opening hours for a single day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    /// Opening time, "HH:MM".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<String>,

    /// Closing time, "HH:MM".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<String>,

    /// Closed all day. When set, `open` and `close` are ignored.
    #[serde(default)]
    pub closed: bool,
}

impl DayHours {
    /// Hours for a day that is open from `open` to `close`.
    pub fn open(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: Some(open.into()),
            close: Some(close.into()),
            closed: false,
        }
    }

    /// Hours for a day that is closed.
    pub fn closed() -> Self {
        Self {
            open: None,
            close: None,
            closed: true,
        }
    }

    /// The normalized opening interval, or `None` if the day is closed.
    ///
    /// A day that is not flagged closed but lacks a bound, or has a bound
    /// that does not parse, is treated as closed.
    pub fn interval(&self) -> Option<OpeningInterval> {
        if self.closed {
            return None;
        }

        let (Some(open), Some(close)) = (self.open.as_deref(), self.close.as_deref()) else {
            debug!(open = ?self.open, close = ?self.close, "day missing a bound, treating as closed");
            return None;
        };

        match (TimeOfDay::parse_hhmm(open), TimeOfDay::parse_hhmm(close)) {
            (Ok(open), Ok(close)) => Some(OpeningInterval { open, close }),
            (open_result, close_result) => {
                debug!(
                    ?open_result,
                    ?close_result,
                    "malformed opening hours, treating as closed"
                );
                None
            }
        }
    }
}

/// An opening interval within one day, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpeningInterval {
    pub open: TimeOfDay,
    pub close: TimeOfDay,
}

impl OpeningInterval {
    /// Create an interval.
    pub fn new(open: TimeOfDay, close: TimeOfDay) -> Self {
        Self { open, close }
    }

    /// Whether `time` falls within the interval, including both endpoints.
    ///
    /// Intervals whose close precedes their open (e.g. 22:00-02:00) are not
    /// treated as wrapping past midnight, so they contain no times at all.
    pub fn contains(&self, time: TimeOfDay) -> bool {
        self.open <= time && time <= self.close
    }

    /// Whether the close time precedes the open time.
    pub fn is_overnight(&self) -> bool {
        self.close < self.open
    }
}

/// Opening hours for each day of the week, keyed by lowercase day name.
///
/// Days that are missing from the map are closed. Deserialization never
/// fails on a bad day entry: `null` days are dropped and entries of the
/// wrong shape become closed days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WeeklySchedule {
    days: HashMap<String, DayHours>,
}

impl<'de> Deserialize<'de> for WeeklySchedule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;

        let entries = match raw {
            serde_json::Value::Object(entries) => entries,
            serde_json::Value::Null => return Ok(Self::new()),
            other => {
                debug!(value = %other, "opening hours are not an object, treating as closed");
                return Ok(Self::new());
            }
        };

        let days = entries
            .into_iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(day, value)| {
                let hours = serde_json::from_value(value).unwrap_or_else(|e| {
                    debug!(%day, error = %e, "malformed day entry, treating as closed");
                    DayHours::closed()
                });
                (day, hours)
            })
            .collect();

        Ok(Self { days })
    }
}

impl WeeklySchedule {
    /// Create an empty schedule (closed every day).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hours for a day, replacing any previous entry.
    pub fn with_day(mut self, day: Weekday, hours: DayHours) -> Self {
        self.days.insert(day_key(day).to_string(), hours);
        self
    }

    /// The same hours on every day of the week.
    pub fn every_day(hours: DayHours) -> Self {
        crate::domain::WEEK
            .iter()
            .fold(Self::new(), |schedule, day| schedule.with_day(*day, hours.clone()))
    }

    /// Hours recorded for a day, if any.
    pub fn get(&self, day: Weekday) -> Option<&DayHours> {
        self.days.get(day_key(day))
    }

    /// The opening interval on a day, or `None` if the day is closed.
    pub fn interval_on(&self, day: Weekday) -> Option<OpeningInterval> {
        self.get(day).and_then(DayHours::interval)
    }

    /// Whether no day has an entry.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
