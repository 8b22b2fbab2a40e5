//! Route fetch error types.

use std::fmt;

use serde::Serialize;

/// Errors from fetching a route.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// HTTP request failed (connection refused, DNS, reset, ...)
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// Transport failure reported by a non-HTTP fetcher
    #[error("network error: {0}")]
    Network(String),

    /// Request did not complete within the configured timeout
    #[error("route request timed out")]
    Timeout,

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body could not be decoded
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Invalid or missing access token
    #[error("unauthorized (invalid access token)")]
    Unauthorized,

    /// The routing service found no route between the points
    #[error("no route found: {0}")]
    NoRoute(String),
}

impl RouteError {
    /// The failure category shown to the user.
    pub fn reason(&self) -> FailureReason {
        match self {
            RouteError::Timeout => FailureReason::Timeout,
            RouteError::NoRoute(_) => FailureReason::NoRouteFound,
            RouteError::Http(_)
            | RouteError::Network(_)
            | RouteError::Api { .. }
            | RouteError::Json { .. }
            | RouteError::Unauthorized => FailureReason::NetworkError,
        }
    }
}

impl From<reqwest::Error> for RouteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RouteError::Timeout
        } else {
            RouteError::Http(err)
        }
    }
}

/// Why a route request failed, as exposed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FailureReason {
    NetworkError,
    NoRouteFound,
    Timeout,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NetworkError => f.write_str("network error"),
            FailureReason::NoRouteFound => f.write_str("no route found"),
            FailureReason::Timeout => f.write_str("timed out"),
        }
    }
}
