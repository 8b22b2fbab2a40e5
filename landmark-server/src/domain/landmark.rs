//! Landmark records.

use serde::{Deserialize, Serialize};

use crate::schedule::{OpenStatus, ScheduleGroup, WeeklySchedule, compress, is_open_at, open_status};

use super::{LandmarkId, LatLng, WeekInstant};

/// Image shown for landmarks that have none on record.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150";

/// Category assigned to landmarks that have none on record.
pub const DEFAULT_CATEGORY: &str = "Others";

/// A point of interest, as read from the data store.
///
/// Treated as an immutable snapshot: nothing in this crate modifies a
/// landmark once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "LandmarkRecord")]
pub struct Landmark {
    pub id: LandmarkId,

    pub name: String,

    pub location: LatLng,

    pub image: String,

    pub address: String,

    /// Entrance fee in pesos. Absent or zero means free entry.
    pub entrance_fee: Option<f64>,

    pub description: String,

    /// `categoryOption` if set, else `category`, else [`DEFAULT_CATEGORY`].
    pub category: String,

    /// Weekly opening hours, if the landmark has any on record.
    pub schedule: Option<WeeklySchedule>,
}

/// A landmark exactly as stored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LandmarkRecord {
    id: LandmarkId,

    name: String,

    location: LatLng,

    #[serde(default = "placeholder_image", deserialize_with = "image_or_placeholder")]
    image: String,

    #[serde(default)]
    address: String,

    #[serde(default)]
    entrance_fee: Option<f64>,

    #[serde(default)]
    description: String,

    #[serde(default)]
    category_option: Option<String>,

    #[serde(default)]
    category: Option<String>,

    #[serde(default, alias = "openingHours")]
    schedule: Option<WeeklySchedule>,
}

impl From<LandmarkRecord> for Landmark {
    fn from(record: LandmarkRecord) -> Self {
        let category = [record.category_option, record.category]
            .into_iter()
            .flatten()
            .map(|c| c.trim().to_string())
            .find(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        Self {
            id: record.id,
            name: record.name,
            location: record.location,
            image: record.image,
            address: record.address,
            entrance_fee: record.entrance_fee,
            description: record.description,
            category,
            schedule: record.schedule,
        }
    }
}

fn placeholder_image() -> String {
    PLACEHOLDER_IMAGE.to_string()
}

fn image_or_placeholder<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let image = Option::<String>::deserialize(deserializer)?;
    Ok(match image.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => placeholder_image(),
    })
}

impl Landmark {
    /// Whether the landmark is open at `instant`.
    ///
    /// Landmarks without opening hours are never open.
    pub fn is_open_at(&self, instant: WeekInstant) -> bool {
        self.schedule
            .as_ref()
            .is_some_and(|schedule| is_open_at(schedule, instant))
    }

    /// Status line for the landmark at `instant`.
    pub fn open_status(&self, instant: WeekInstant) -> OpenStatus {
        open_status(self.schedule.as_ref(), instant)
    }

    /// Weekly hours compressed into display ranges.
    ///
    /// Landmarks without opening hours show as closed all week.
    pub fn compressed_schedule(&self) -> Vec<ScheduleGroup> {
        match &self.schedule {
            Some(schedule) => compress(schedule),
            None => compress(&WeeklySchedule::new()),
        }
    }

    /// "Free", or the fee with a peso prefix ("P150").
    pub fn entrance_label(&self) -> String {
        match self.entrance_fee {
            Some(fee) if fee > 0.0 => format!("P{fee}"),
            _ => "Free".to_string(),
        }
    }

    /// Case-insensitive substring match on name or category.
    ///
    /// An empty query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        self.name.to_lowercase().contains(&query) || self.category.to_lowercase().contains(&query)
    }
}
