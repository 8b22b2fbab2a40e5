//! Directions HTTP client.
//!
//! Queries the Mapbox Directions API for the distance and travel time
//! between two points. Handles authentication, concurrency limiting, and
//! mapping of API error codes to [`RouteError`].

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::LatLng;

use super::error::RouteError;
use super::types::DirectionsResponse;
use super::{RouteFetcher, RouteMetrics};

/// Default base URL for the Mapbox API.
const DEFAULT_BASE_URL: &str = "https://api.mapbox.com";

/// Default routing profile. Landmarks are mostly explored on foot.
const DEFAULT_PROFILE: &str = "walking";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Configuration for the directions client.
#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    /// Mapbox access token
    pub access_token: String,
    /// Base URL for the API (defaults to production Mapbox)
    pub base_url: String,
    /// Routing profile: "walking", "driving", "cycling" or "driving-traffic"
    pub profile: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DirectionsConfig {
    /// Create a new config with the given access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 15,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the routing profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Mapbox Directions API client.
#[derive(Debug, Clone)]
pub struct DirectionsClient {
    http: reqwest::Client,
    base_url: String,
    profile: String,
    access_token: String,
    semaphore: Arc<Semaphore>,
}

impl DirectionsClient {
    /// Create a new directions client with the given configuration.
    pub fn new(config: DirectionsConfig) -> Result<Self, RouteError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            profile: config.profile,
            access_token: config.access_token,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Get the best route from `origin` to `destination`.
    pub async fn get_route(
        &self,
        origin: LatLng,
        destination: LatLng,
    ) -> Result<RouteMetrics, RouteError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| RouteError::Network("semaphore closed".to_string()))?;

        // Mapbox takes coordinates as lng,lat pairs separated by semicolons
        let url = format!(
            "{}/directions/v5/mapbox/{}/{},{};{},{}",
            self.base_url,
            self.profile,
            origin.lng(),
            origin.lat(),
            destination.lng(),
            destination.lat()
        );

        debug!(%origin, %destination, profile = %self.profile, "requesting directions");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("access_token", self.access_token.as_str()),
                ("overview", "false"),
                ("alternatives", "false"),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(RouteError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            // Unroutable coordinates come back as 422 with a NoSegment code
            if let Ok(DirectionsResponse { code, message, .. }) = serde_json::from_str(&body) {
                if is_no_route_code(&code) {
                    return Err(RouteError::NoRoute(message.unwrap_or(code)));
                }
            }

            return Err(RouteError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let directions: DirectionsResponse =
            serde_json::from_str(&body).map_err(|e| RouteError::Json {
                message: e.to_string(),
            })?;

        route_from_response(directions)
    }
}

impl RouteFetcher for DirectionsClient {
    fn fetch_route(
        &self,
        origin: LatLng,
        destination: LatLng,
    ) -> BoxFuture<'_, Result<RouteMetrics, RouteError>> {
        self.get_route(origin, destination).boxed()
    }
}

/// Extract the best route from a decoded response.
fn route_from_response(response: DirectionsResponse) -> Result<RouteMetrics, RouteError> {
    let DirectionsResponse {
        code,
        message,
        routes,
    } = response;

    if code == "Ok" {
        return routes
            .first()
            .map(|route| RouteMetrics::new(route.distance, route.duration))
            .ok_or_else(|| RouteError::NoRoute("response contained no routes".to_string()));
    }

    if is_no_route_code(&code) {
        return Err(RouteError::NoRoute(message.unwrap_or(code)));
    }

    Err(RouteError::Api {
        status: 200,
        message: match message {
            Some(message) => format!("{code}: {message}"),
            None => code,
        },
    })
}

fn is_no_route_code(code: &str) -> bool {
    code == "NoRoute" || code == "NoSegment"
}
