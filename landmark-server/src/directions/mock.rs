//! Offline route estimates for running without directions API access.
//!
//! Estimates a walking route from the great-circle distance, stretched by a
//! detour factor since streets rarely run straight to the destination.

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::domain::LatLng;

use super::error::RouteError;
use super::{RouteFetcher, RouteMetrics};

/// Typical ratio of street distance to straight-line distance in a city grid.
const DEFAULT_DETOUR_FACTOR: f64 = 1.3;

/// Average walking speed (about 5 km/h).
const DEFAULT_SPEED_MPS: f64 = 1.4;

/// Route fetcher that estimates routes without any network access.
///
/// Useful for development and demos without a Mapbox access token.
#[derive(Debug, Clone)]
pub struct StraightLineRoutes {
    detour_factor: f64,
    speed_mps: f64,
    max_distance_meters: Option<f64>,
}

impl Default for StraightLineRoutes {
    fn default() -> Self {
        Self {
            detour_factor: DEFAULT_DETOUR_FACTOR,
            speed_mps: DEFAULT_SPEED_MPS,
            max_distance_meters: None,
        }
    }
}

impl StraightLineRoutes {
    /// Create an estimator with walking defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the travel speed in meters per second.
    pub fn with_speed(mut self, speed_mps: f64) -> Self {
        self.speed_mps = speed_mps;
        self
    }

    /// Report no route for destinations further than `meters` (street distance).
    pub fn with_max_distance(mut self, meters: f64) -> Self {
        self.max_distance_meters = Some(meters);
        self
    }

    /// Estimate the route between two points.
    pub fn estimate(&self, origin: LatLng, destination: LatLng) -> Result<RouteMetrics, RouteError> {
        let distance = origin.distance_meters(&destination) * self.detour_factor;

        if self.max_distance_meters.is_some_and(|max| distance > max) {
            return Err(RouteError::NoRoute(format!(
                "{:.0} m exceeds walking range",
                distance
            )));
        }

        Ok(RouteMetrics::new(distance, distance / self.speed_mps))
    }
}

impl RouteFetcher for StraightLineRoutes {
    fn fetch_route(
        &self,
        origin: LatLng,
        destination: LatLng,
    ) -> BoxFuture<'_, Result<RouteMetrics, RouteError>> {
        futures::future::ready(self.estimate(origin, destination)).boxed()
    }
}
