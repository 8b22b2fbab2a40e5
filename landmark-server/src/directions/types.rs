//! Directions API response DTOs.
//!
//! These map to the Mapbox Directions v5 JSON response. Only the fields
//! needed for distance and duration are modelled.

use serde::Deserialize;

/// Top-level response from the directions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    /// "Ok" on success, otherwise an error code such as "NoRoute".
    pub code: String,

    /// Human-readable error message, present on errors.
    pub message: Option<String>,

    /// Candidate routes, best first.
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

/// A single route.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsRoute {
    /// Length in meters.
    pub distance: f64,

    /// Estimated travel time in seconds.
    pub duration: f64,
}
