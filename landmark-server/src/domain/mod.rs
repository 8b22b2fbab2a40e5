//! Domain types for landmark availability.
//!
//! This module contains the validated core types: times of day, instants in
//! the week, coordinates, and landmark records. Types that carry invariants
//! enforce them at construction, so code that receives them can trust them.

mod landmark;
mod landmark_id;
mod location;
mod time;

pub use landmark::{DEFAULT_CATEGORY, Landmark, PLACEHOLDER_IMAGE};
pub use landmark_id::{InvalidLandmarkId, LandmarkId};
pub use location::{InvalidCoordinate, LatLng};
pub use time::{TimeError, TimeOfDay, WEEK, WeekInstant, day_key, day_label};
