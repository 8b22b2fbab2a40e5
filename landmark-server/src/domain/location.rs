//! Geographic coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle distances.
const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Error returned for coordinates outside the valid range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({lat}, {lng}): {reason}")]
pub struct InvalidCoordinate {
    lat: f64,
    lng: f64,
    reason: &'static str,
}

/// A WGS84 latitude/longitude pair in degrees.
///
/// # Examples
///
/// ```
/// use landmark_server::domain::LatLng;
///
/// let intramuros = LatLng::new(14.5896, 120.9747).unwrap();
/// assert_eq!(intramuros.lat(), 14.5896);
///
/// assert!(LatLng::new(91.0, 0.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLatLng")]
pub struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawLatLng {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawLatLng> for LatLng {
    type Error = InvalidCoordinate;

    fn try_from(raw: RawLatLng) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lng)
    }
}

impl LatLng {
    /// Create a coordinate, checking latitude is in [-90, 90] and longitude
    /// in [-180, 180].
    pub fn new(lat: f64, lng: f64) -> Result<Self, InvalidCoordinate> {
        let invalid = |reason| InvalidCoordinate { lat, lng, reason };
        if !lat.is_finite() || !lng.is_finite() {
            return Err(invalid("coordinates must be finite"));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(invalid("latitude must be within -90..=90"));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(invalid("longitude must be within -180..=180"));
        }
        Ok(Self { lat, lng })
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Great-circle distance to `other` in meters (haversine).
    pub fn distance_meters(&self, other: &LatLng) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let dlat = lat2 - lat1;
        let dlng = (other.lng - self.lng).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_METERS * a.sqrt().asin()
    }
}

impl fmt::Debug for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LatLng({}, {})", self.lat, self.lng)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range() {
        assert!(LatLng::new(-90.0, -180.0).is_ok());
        assert!(LatLng::new(90.0, 180.0).is_ok());
        assert!(LatLng::new(90.5, 0.0).is_err());
        assert!(LatLng::new(0.0, -180.5).is_err());
        assert!(LatLng::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn deserialize_validates() {
        let ok: LatLng = serde_json::from_str(r#"{"lat": 14.59, "lng": 120.97}"#).unwrap();
        assert_eq!(ok.lng(), 120.97);

        let bad = serde_json::from_str::<LatLng>(r#"{"lat": 140.0, "lng": 120.97}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn distance_zero_for_same_point() {
        let p = LatLng::new(14.5896, 120.9747).unwrap();
        assert_eq!(p.distance_meters(&p), 0.0);
    }

    #[test]
    fn distance_one_degree_latitude() {
        let a = LatLng::new(0.0, 0.0).unwrap();
        let b = LatLng::new(1.0, 0.0).unwrap();
        let d = a.distance_meters(&b);
        // One degree of arc is about 111.2 km
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
        assert!((b.distance_meters(&a) - d).abs() < 1e-6);
    }
}
