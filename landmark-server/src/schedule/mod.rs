//! Landmark opening hours.
//!
//! Evaluates whether a landmark is open at a given instant and compresses
//! its weekly hours into display ranges. Everything here is pure: callers
//! pass the instant explicitly.

mod compress;
mod evaluate;
mod hours;

pub use compress::{ScheduleGroup, compress, display_text};
pub use evaluate::{OpenStatus, is_open_at, open_status};
pub use hours::{DayHours, OpeningInterval, WeeklySchedule};
