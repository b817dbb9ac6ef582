//! Geographic coordinate primitives.
//!
//! Provides the coordinate type shared by the tracking, zoom, and geocoding
//! modules, plus great-circle distance and angle normalization helpers.

use std::f64::consts::PI;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;

/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;

/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;

/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Mean Earth radius in meters (IUGG).
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are inside the valid geographic range.
    pub fn is_valid(&self) -> bool {
        (MIN_LAT..=MAX_LAT).contains(&self.latitude)
            && (MIN_LON..=MAX_LON).contains(&self.longitude)
    }

    /// Great-circle distance to another coordinate in meters.
    ///
    /// Uses the haversine formula, which is accurate to well under a meter
    /// at the displacement scales the tracking gates care about (50-100m).
    pub fn distance_m(&self, other: &Coordinate) -> f64 {
        let lat1 = self.latitude * PI / 180.0;
        let lat2 = other.latitude * PI / 180.0;
        let dlat = (other.latitude - self.latitude) * PI / 180.0;
        let dlon = (other.longitude - self.longitude) * PI / 180.0;

        let a = (dlat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Normalize an angle in degrees into `[0, 360)`.
///
/// Examples: 370 → 10, -10 → 350, 720 → 0.
#[inline]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees % 360.0;
    if normalized < 0.0 {
        normalized + 360.0
    } else {
        normalized
    }
}
