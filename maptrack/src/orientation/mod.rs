//! Camera orientation controller.
//!
//! The camera is either locked to true north or rotated to follow the
//! direction of travel. Mode switches notify observers synchronously so
//! the visual rotation happens immediately rather than waiting for the
//! next fix.

use tracing::debug;

use crate::coord::normalize_degrees;
use crate::location::LocationFix;

/// Camera orientation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrientationMode {
    /// Camera heading locked to true north.
    #[default]
    NorthUp,
    /// Camera heading follows the direction of travel.
    HeadingUp,
}

impl OrientationMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            OrientationMode::NorthUp => OrientationMode::HeadingUp,
            OrientationMode::HeadingUp => OrientationMode::NorthUp,
        }
    }

    /// String tag used for persistence.
    pub fn as_tag(&self) -> &'static str {
        match self {
            OrientationMode::NorthUp => "north_up",
            OrientationMode::HeadingUp => "heading_up",
        }
    }

    /// Parse a persisted string tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "north_up" => Some(OrientationMode::NorthUp),
            "heading_up" => Some(OrientationMode::HeadingUp),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrientationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrientationMode::NorthUp => write!(f, "north-up"),
            OrientationMode::HeadingUp => write!(f, "heading-up"),
        }
    }
}

/// Observer invoked synchronously after each mode change.
pub type OrientationObserver = Box<dyn Fn(OrientationMode) + Send + Sync>;

/// Owns the orientation mode and the heading math derived from it.
pub struct OrientationController {
    mode: OrientationMode,
    observers: Vec<OrientationObserver>,
}

impl std::fmt::Debug for OrientationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrientationController")
            .field("mode", &self.mode)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for OrientationController {
    fn default() -> Self {
        Self::new(OrientationMode::NorthUp)
    }
}

impl OrientationController {
    /// Create a controller in the given mode.
    pub fn new(mode: OrientationMode) -> Self {
        Self {
            mode,
            observers: Vec::new(),
        }
    }

    /// Current mode.
    pub fn mode(&self) -> OrientationMode {
        self.mode
    }

    /// Register an observer for mode changes.
    pub fn add_observer(&mut self, observer: OrientationObserver) {
        self.observers.push(observer);
    }

    /// Flip the mode and notify observers synchronously.
    ///
    /// Returns the new mode.
    pub fn toggle(&mut self) -> OrientationMode {
        self.set_mode(self.mode.toggled());
        self.mode
    }

    /// Set the mode directly, notifying observers when it changes.
    ///
    /// Used when restoring a persisted mode at startup.
    pub fn set_mode(&mut self, mode: OrientationMode) {
        if mode == self.mode {
            return;
        }
        debug!(from = %self.mode, to = %mode, "Orientation mode changed");
        self.mode = mode;
        for observer in &self.observers {
            observer(mode);
        }
    }

    /// Camera heading for a fix under the current mode, in degrees.
    ///
    /// North-up always faces north. Heading-up follows the fix's course;
    /// an invalid course falls back to due north.
    pub fn heading_for_camera(&self, fix: &LocationFix) -> f64 {
        match self.mode {
            OrientationMode::NorthUp => 0.0,
            OrientationMode::HeadingUp => {
                if fix.has_valid_course() {
                    fix.course_deg
                } else {
                    0.0
                }
            }
        }
    }

    /// Rotation applied to north-referenced display elements, in degrees.
    ///
    /// North-up never rotates. Heading-up counter-rotates by the camera
    /// heading, normalized into `[0, 360)`.
    pub fn rotation_for_display(&self, heading_deg: f64) -> f64 {
        match self.mode {
            OrientationMode::NorthUp => 0.0,
            OrientationMode::HeadingUp => normalize_degrees(-heading_deg),
        }
    }

    /// Whether the user may rotate the camera by gesture.
    ///
    /// Rotation is disabled entirely in north-up so the camera cannot
    /// drift off axis.
    pub fn is_user_rotation_enabled(&self) -> bool {
        self.mode == OrientationMode::HeadingUp
    }
}
