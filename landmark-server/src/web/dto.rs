//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::directions::FailureReason;
use crate::domain::{Landmark, LatLng, WeekInstant};
use crate::ratings::RatingSummary;
use crate::route::RouteState;
use crate::schedule::ScheduleGroup;

/// Query for the landmark list.
#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    /// Substring of the name or category; empty lists everything
    #[serde(default)]
    pub q: String,
}

/// A landmark as shown in lists.
#[derive(Debug, Serialize)]
pub struct LandmarkSummary {
    pub id: String,
    pub name: String,
    pub image: String,
    pub category: String,
    pub address: String,

    /// Whether the landmark is open right now
    pub is_open: bool,

    /// Status line, e.g. "Open now until 17:00"
    pub status: String,

    /// "Free" or the fee, e.g. "P75"
    pub entrance: String,
}

/// Landmark list response.
#[derive(Debug, Serialize)]
pub struct LandmarkListResponse {
    pub landmarks: Vec<LandmarkSummary>,
}

/// Landmarks sharing a category.
#[derive(Debug, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub landmarks: Vec<LandmarkSummary>,
}

/// Landmarks grouped by category.
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryGroup>,
}

/// One line of the weekly schedule.
#[derive(Debug, PartialEq, Serialize)]
pub struct ScheduleLine {
    /// "Monday - Friday"
    pub days: String,
    /// "Open from 9:00 AM to 5:00 PM" or "Closed"
    pub hours: String,
    /// Whether the landmark is closed on these days
    pub closed: bool,
}

/// Full landmark details.
#[derive(Debug, Serialize)]
pub struct LandmarkDetail {
    #[serde(flatten)]
    pub summary: LandmarkSummary,

    pub description: String,

    pub location: LatLng,

    pub entrance_fee: Option<f64>,

    /// Compressed weekly schedule
    pub schedule: Vec<ScheduleLine>,

    pub rating: RatingSummary,

    /// e.g. "4.5 / 5 (2 reviews)"
    pub rating_text: String,
}

/// Route state for the selected landmark.
#[derive(Debug, PartialEq, Serialize)]
pub struct RouteResponse {
    /// "idle", "loading", "ready" or "failed"
    pub state: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub landmark_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,

    /// e.g. "1.25 km"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_text: Option<String>,

    /// e.g. "15 min"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
}

/// Device location update.
#[derive(Debug, Deserialize)]
pub struct LocationRequest {
    pub lat: f64,
    pub lng: f64,
}

/// Device location in effect.
#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub origin: LatLng,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl LandmarkSummary {
    /// Summarize a landmark as of `now`.
    pub fn from_landmark(landmark: &Landmark, now: WeekInstant) -> Self {
        let status = landmark.open_status(now);

        Self {
            id: landmark.id.as_str().to_string(),
            name: landmark.name.clone(),
            image: landmark.image.clone(),
            category: landmark.category.clone(),
            address: landmark.address.clone(),
            is_open: status.is_open(),
            status: status.to_string(),
            entrance: landmark.entrance_label(),
        }
    }
}

impl From<&ScheduleGroup> for ScheduleLine {
    fn from(group: &ScheduleGroup) -> Self {
        Self {
            days: group.label(),
            hours: group.text(),
            closed: group.is_closed(),
        }
    }
}

impl LandmarkDetail {
    /// Build the detail view of a landmark.
    pub fn new(landmark: &Landmark, rating: RatingSummary, now: WeekInstant) -> Self {
        Self {
            summary: LandmarkSummary::from_landmark(landmark, now),
            description: landmark.description.clone(),
            location: landmark.location,
            entrance_fee: landmark.entrance_fee,
            schedule: landmark
                .compressed_schedule()
                .iter()
                .map(ScheduleLine::from)
                .collect(),
            rating,
            rating_text: rating.to_string(),
        }
    }
}

impl From<&RouteState> for RouteResponse {
    fn from(state: &RouteState) -> Self {
        let empty = |state: &'static str| RouteResponse {
            state,
            landmark_id: None,
            distance_meters: None,
            duration_seconds: None,
            distance_text: None,
            duration_text: None,
            reason: None,
        };

        match state {
            RouteState::Idle => empty("idle"),
            RouteState::Loading { landmark } => RouteResponse {
                landmark_id: Some(landmark.as_str().to_string()),
                ..empty("loading")
            },
            RouteState::Ready { landmark, route } => RouteResponse {
                landmark_id: Some(landmark.as_str().to_string()),
                distance_meters: Some(route.distance_meters),
                duration_seconds: Some(route.duration_seconds),
                distance_text: Some(route.distance_text()),
                duration_text: Some(route.duration_text()),
                ..empty("ready")
            },
            RouteState::Failed { landmark, reason } => RouteResponse {
                landmark_id: Some(landmark.as_str().to_string()),
                reason: Some(*reason),
                ..empty("failed")
            },
        }
    }
}
