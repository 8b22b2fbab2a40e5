//! Server configuration from the environment.
//!
//! | Variable                  | Default                  |
//! |---------------------------|--------------------------|
//! | `LANDMARK_DATA`           | `data/landmarks.json`    |
//! | `LANDMARK_BIND`           | `127.0.0.1:3000`         |
//! | `MAPBOX_ACCESS_TOKEN`     | unset: offline estimates |
//! | `MAPBOX_PROFILE`          | `walking`                |
//! | `ORIGIN_LAT`/`ORIGIN_LNG` | Intramuros, Manila       |

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::cache::CacheConfig;
use crate::directions::DirectionsConfig;
use crate::domain::{InvalidCoordinate, LatLng};

const DEFAULT_DATA_PATH: &str = "data/landmarks.json";

const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Device location assumed until the client reports one.
const DEFAULT_ORIGIN: (f64, f64) = (14.5896, 120.9747);

/// Errors from reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid bind address {value:?}: {source}")]
    InvalidBind {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("{var} is not a number: {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("ORIGIN_LAT and ORIGIN_LNG must be set together")]
    PartialOrigin,

    #[error("invalid origin: {0}")]
    InvalidOrigin(#[from] InvalidCoordinate),
}

/// Everything `main` needs to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Catalog snapshot file.
    pub data_path: PathBuf,

    /// Address to listen on.
    pub bind: SocketAddr,

    /// Initial device location.
    pub origin: LatLng,

    /// Directions API settings; `None` means use offline estimates.
    pub directions: Option<DirectionsConfig>,

    /// Route cache settings.
    pub cache: CacheConfig,
}

impl ServerConfig {
    /// Read configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration using `lookup` to resolve variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let data_path = var("LANDMARK_DATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let bind_str = var("LANDMARK_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_str
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidBind {
                value: bind_str.clone(),
                source,
            })?;

        let origin = match (var("ORIGIN_LAT"), var("ORIGIN_LNG")) {
            (None, None) => LatLng::new(DEFAULT_ORIGIN.0, DEFAULT_ORIGIN.1)?,
            (Some(lat), Some(lng)) => LatLng::new(
                parse_number("ORIGIN_LAT", &lat)?,
                parse_number("ORIGIN_LNG", &lng)?,
            )?,
            _ => return Err(ConfigError::PartialOrigin),
        };

        let directions = var("MAPBOX_ACCESS_TOKEN").map(|token| {
            let config = DirectionsConfig::new(token.trim());
            match var("MAPBOX_PROFILE") {
                Some(profile) => config.with_profile(profile.trim()),
                None => config,
            }
        });

        Ok(Self {
            data_path,
            bind,
            origin,
            directions,
            cache: CacheConfig::default(),
        })
    }
}

fn parse_number(var: &'static str, value: &str) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        })
}
