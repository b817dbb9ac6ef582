//! Discrete zoom level model.
//!
//! Maps a discrete zoom index to a camera altitude. The map viewer exposes
//! stepped zoom buttons rather than continuous pinch zoom, so the camera
//! distance is always one of a fixed table of altitudes.

/// Camera altitudes in meters, indexed by zoom level.
///
/// Index 0 is the most zoomed-in view. The table is strictly increasing.
pub const ZOOM_ALTITUDES_M: [f64; 12] = [
    200.0,
    500.0,
    1_000.0,
    2_000.0,
    5_000.0,
    10_000.0,
    20_000.0,
    50_000.0,
    100_000.0,
    200_000.0,
    500_000.0,
    1_000_000.0,
];

/// Lowest valid zoom index (most zoomed-in).
pub const MIN_ZOOM_INDEX: usize = 0;

/// Highest valid zoom index (most zoomed-out).
pub const MAX_ZOOM_INDEX: usize = ZOOM_ALTITUDES_M.len() - 1;

/// Discrete zoom state for the map camera.
///
/// The index is always clamped to `[MIN_ZOOM_INDEX, MAX_ZOOM_INDEX]`;
/// stepping past either bound is a no-op.
#[derive(Debug, Clone)]
pub struct ZoomLevelModel {
    index: usize,
}

impl Default for ZoomLevelModel {
    fn default() -> Self {
        // Mid-table default: 10km, a city-scale overview
        Self { index: 5 }
    }
}

impl ZoomLevelModel {
    /// Create a model at the given index, clamped to the valid range.
    pub fn new(index: usize) -> Self {
        Self {
            index: index.min(MAX_ZOOM_INDEX),
        }
    }

    /// Current zoom index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Camera altitude for the current index, in meters.
    pub fn current_altitude(&self) -> f64 {
        ZOOM_ALTITUDES_M[self.index]
    }

    /// Whether a further zoom-in step would change the index.
    pub fn can_zoom_in(&self) -> bool {
        self.index > MIN_ZOOM_INDEX
    }

    /// Whether a further zoom-out step would change the index.
    pub fn can_zoom_out(&self) -> bool {
        self.index < MAX_ZOOM_INDEX
    }

    /// Step one level toward the ground. No-op at the lower bound.
    ///
    /// Returns true if the index changed.
    pub fn zoom_in(&mut self) -> bool {
        if self.can_zoom_in() {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Step one level away from the ground. No-op at the upper bound.
    ///
    /// Returns true if the index changed.
    pub fn zoom_out(&mut self) -> bool {
        if self.can_zoom_out() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Set the index directly, clamped to the valid range.
    pub fn set_zoom_index(&mut self, index: usize) {
        self.index = index.min(MAX_ZOOM_INDEX);
    }

    /// Select the index whose altitude is closest to the given altitude.
    ///
    /// Closeness is absolute difference in meters. An altitude exactly
    /// equidistant between two table entries resolves to the lower index.
    pub fn set_nearest_zoom_index(&mut self, altitude_m: f64) {
        let mut best = 0;
        let mut best_diff = f64::INFINITY;

        for (i, table_altitude) in ZOOM_ALTITUDES_M.iter().enumerate() {
            let diff = (altitude_m - table_altitude).abs();
            if diff < best_diff {
                best = i;
                best_diff = diff;
            }
        }

        self.index = best;
    }
}
