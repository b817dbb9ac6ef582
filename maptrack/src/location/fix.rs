//! Position fix type and the source-boundary accuracy gate.

use chrono::{DateTime, Utc};

use crate::coord::Coordinate;

/// Maximum horizontal accuracy radius accepted from a location source.
///
/// Fixes with a larger (worse) radius are too vague to steer the camera
/// and are rejected before delivery.
pub const MAX_HORIZONTAL_ACCURACY_M: f64 = 100.0;

/// A single position fix from a location source.
///
/// Fixes are ephemeral: the tracking controller folds them into its own
/// state and discards them. They are never persisted.
#[derive(Debug, Clone, Copy)]
pub struct LocationFix {
    /// Position of the fix.
    pub coordinate: Coordinate,
    /// Horizontal accuracy radius in meters. Negative means invalid.
    pub horizontal_accuracy_m: f64,
    /// Vertical accuracy in meters. Negative means invalid.
    pub vertical_accuracy_m: f64,
    /// Course over ground in degrees from true north. -1 means invalid.
    pub course_deg: f64,
    /// Ground speed in meters per second. Negative means invalid.
    pub speed_mps: f64,
    /// Altitude above sea level in meters.
    pub altitude_m: f64,
    /// Wall-clock time the fix was taken.
    pub timestamp: DateTime<Utc>,
}

impl LocationFix {
    /// Create a fix with the given position, taken now, with everything
    /// else marked unknown/invalid.
    pub fn at(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            horizontal_accuracy_m: 0.0,
            vertical_accuracy_m: -1.0,
            course_deg: -1.0,
            speed_mps: -1.0,
            altitude_m: 0.0,
            timestamp: Utc::now(),
        }
    }

    /// Set the horizontal accuracy radius.
    pub fn with_horizontal_accuracy(mut self, meters: f64) -> Self {
        self.horizontal_accuracy_m = meters;
        self
    }

    /// Set the course over ground.
    pub fn with_course(mut self, degrees: f64) -> Self {
        self.course_deg = degrees;
        self
    }

    /// Set the ground speed.
    pub fn with_speed(mut self, mps: f64) -> Self {
        self.speed_mps = mps;
        self
    }

    /// Set the altitude.
    pub fn with_altitude(mut self, meters: f64) -> Self {
        self.altitude_m = meters;
        self
    }

    /// Whether the fix clears the source-boundary accuracy gate.
    ///
    /// Sources must drop fixes that fail this check; they never reach the
    /// tracking engine.
    pub fn passes_accuracy_gate(&self) -> bool {
        (0.0..=MAX_HORIZONTAL_ACCURACY_M).contains(&self.horizontal_accuracy_m)
    }

    /// Whether the course field carries a usable direction.
    pub fn has_valid_course(&self) -> bool {
        self.course_deg >= 0.0
    }

    /// Whether the speed field carries a usable value.
    pub fn has_valid_speed(&self) -> bool {
        self.speed_mps >= 0.0
    }
}
