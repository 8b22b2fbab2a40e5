//! Route fetching.
//!
//! A [`RouteFetcher`] answers "how far, and how long, from here to there".
//! The route coordinator only talks to this trait; implementations are the
//! Mapbox Directions client, an offline straight-line estimator, and the
//! caching wrapper in [`crate::cache`].

mod client;
mod error;
mod mock;
mod types;

use std::sync::Arc;

use futures::future::BoxFuture;
use serde::Serialize;

use crate::domain::LatLng;

pub use client::{DirectionsClient, DirectionsConfig};
pub use error::{FailureReason, RouteError};
pub use mock::StraightLineRoutes;
pub use types::{DirectionsResponse, DirectionsRoute};

/// Distance and travel time of a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteMetrics {
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

impl RouteMetrics {
    /// Create route metrics.
    pub fn new(distance_meters: f64, duration_seconds: f64) -> Self {
        Self {
            distance_meters,
            duration_seconds,
        }
    }

    /// Distance in kilometres with two decimals, e.g. "1.25 km".
    pub fn distance_text(&self) -> String {
        format!("{:.2} km", self.distance_meters / 1000.0)
    }

    /// Duration in whole minutes, e.g. "15 min".
    pub fn duration_text(&self) -> String {
        format!("{:.0} min", self.duration_seconds / 60.0)
    }
}

/// Trait for fetching a route between two points.
///
/// This abstraction allows the route coordinator to be tested with
/// scripted fetchers, and lets a cache wrap any implementation.
pub trait RouteFetcher: Send + Sync {
    /// Fetch the best route from `origin` to `destination`.
    fn fetch_route(
        &self,
        origin: LatLng,
        destination: LatLng,
    ) -> BoxFuture<'_, Result<RouteMetrics, RouteError>>;
}

impl<T: RouteFetcher + ?Sized> RouteFetcher for Arc<T> {
    fn fetch_route(
        &self,
        origin: LatLng,
        destination: LatLng,
    ) -> BoxFuture<'_, Result<RouteMetrics, RouteError>> {
        (**self).fetch_route(origin, destination)
    }
}
