//! Update-frequency adaptation policy.
//!
//! On each accepted fix the tracking controller recomputes a distance
//! filter hint for the location source. The policy buckets by current
//! camera altitude alone: the further out the camera, the less positional
//! resolution the display needs.

use super::source::UpdateFrequencyHint;

/// Altitude bucket boundaries and their distance filters, in meters.
///
/// A camera at or below the altitude gets the paired filter; altitudes
/// beyond the last bucket fall through to [`COARSEST_FILTER_M`].
const ALTITUDE_BUCKETS: [(f64, f64); 3] = [(500.0, 5.0), (2_000.0, 10.0), (10_000.0, 20.0)];

/// Distance filter applied beyond the last altitude bucket.
const COARSEST_FILTER_M: f64 = 50.0;

/// Distance filter for the given camera altitude.
pub fn distance_filter_for_altitude(camera_altitude_m: f64) -> f64 {
    for (altitude, filter) in ALTITUDE_BUCKETS {
        if camera_altitude_m <= altitude {
            return filter;
        }
    }
    COARSEST_FILTER_M
}

/// Update-frequency hint for the given camera altitude.
pub fn hint_for_altitude(camera_altitude_m: f64) -> UpdateFrequencyHint {
    UpdateFrequencyHint::meters(distance_filter_for_altitude(camera_altitude_m))
}
