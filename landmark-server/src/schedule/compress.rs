//! Compression of a weekly schedule into display ranges.
//!
//! Walks the week Monday to Sunday and merges runs of consecutive days with
//! the same hours, so a typical schedule reads as two or three lines
//! ("Monday - Saturday: Open from 9:00 AM to 5:00 PM", "Sunday: Closed").

use chrono::Weekday;

use crate::domain::{WEEK, day_label};

use super::hours::{OpeningInterval, WeeklySchedule};

/// A run of consecutive days sharing the same hours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleGroup {
    /// First day of the run.
    pub first: Weekday,
    /// Last day of the run (equal to `first` for a single day).
    pub last: Weekday,
    /// Opening interval shared by every day in the run, `None` if closed.
    pub hours: Option<OpeningInterval>,
}

impl ScheduleGroup {
    /// "Monday" for a single day, "Monday - Friday" for a run.
    pub fn label(&self) -> String {
        if self.first == self.last {
            day_label(self.first).to_string()
        } else {
            format!("{} - {}", day_label(self.first), day_label(self.last))
        }
    }

    /// "Closed" or "Open from 9:00 AM to 5:00 PM".
    pub fn text(&self) -> String {
        display_text(self.hours)
    }

    /// Whether the run is closed.
    pub fn is_closed(&self) -> bool {
        self.hours.is_none()
    }

    /// Number of days in the run.
    pub fn len(&self) -> usize {
        (self.last.num_days_from_monday() - self.first.num_days_from_monday()) as usize + 1
    }
}

/// Display text for one day's hours.
pub fn display_text(hours: Option<OpeningInterval>) -> String {
    match hours {
        None => "Closed".to_string(),
        Some(interval) => format!(
            "Open from {} to {}",
            interval.open.to_12_hour(),
            interval.close.to_12_hour()
        ),
    }
}

/// Compress a schedule into runs of consecutive days with equal hours.
///
/// Only adjacent days merge: Monday and Wednesday with equal hours stay in
/// separate groups if Tuesday differs. Days compare on their normalized
/// interval, so two spellings of the same time ("9:00" and "09:00") merge.
///
/// # Examples
///
/// ```
/// use chrono::Weekday;
/// use landmark_server::schedule::{DayHours, WeeklySchedule, compress};
///
/// let schedule = WeeklySchedule::every_day(DayHours::open("09:00", "17:00"))
///     .with_day(Weekday::Sun, DayHours::closed());
/// let groups = compress(&schedule);
///
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].label(), "Monday - Saturday");
/// assert_eq!(groups[0].text(), "Open from 9:00 AM to 5:00 PM");
/// assert_eq!(groups[1].label(), "Sunday");
/// assert_eq!(groups[1].text(), "Closed");
/// ```
pub fn compress(schedule: &WeeklySchedule) -> Vec<ScheduleGroup> {
    let mut groups: Vec<ScheduleGroup> = Vec::new();

    for day in WEEK {
        let hours = schedule.interval_on(day);
        match groups.last_mut() {
            Some(current) if current.hours == hours => current.last = day,
            _ => groups.push(ScheduleGroup {
                first: day,
                last: day,
                hours,
            }),
        }
    }

    groups
}
