//! Location source contract and event types.
//!
//! The platform location service sits behind the [`LocationSource`] trait.
//! Sources push [`LocationEvent`]s onto an mpsc channel handed to them at
//! construction; the tracking engine owns the receiving end, so all state
//! mutation stays on its single writer context.

use thiserror::Error;

use super::fix::LocationFix;

/// Authorization state reported by the platform location service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationState {
    /// The user has not yet been asked.
    NotDetermined,
    /// The user declined location access.
    Denied,
    /// Access is blocked by device policy (parental controls, MDM).
    Restricted,
    /// Access granted while the app is in use.
    AuthorizedWhenInUse,
    /// Access granted at all times.
    AuthorizedAlways,
}

impl AuthorizationState {
    /// Whether fixes can be delivered in this state.
    pub fn is_authorized(&self) -> bool {
        matches!(
            self,
            AuthorizationState::AuthorizedWhenInUse | AuthorizationState::AuthorizedAlways
        )
    }
}

/// Failure kinds a location source can report.
#[derive(Debug, Clone, Error)]
pub enum LocationSourceError {
    /// The user denied location authorization.
    #[error("location authorization denied")]
    AuthorizationDenied,

    /// Location services are disabled system-wide.
    #[error("location services are disabled")]
    ServicesDisabled,

    /// A fix update failed for a transient reason.
    #[error("location update failed: {0}")]
    UpdateFailed(String),
}

/// Events emitted by a location source.
#[derive(Debug, Clone)]
pub enum LocationEvent {
    /// A new position fix that cleared the accuracy gate.
    Fix(LocationFix),
    /// The authorization state changed.
    AuthorizationChanged(AuthorizationState),
    /// The source paused fix delivery (stationary device, backgrounding).
    UpdatesPaused,
    /// The source resumed fix delivery.
    UpdatesResumed,
    /// The source failed.
    Failed(LocationSourceError),
}

/// Desired fix-delivery granularity, expressed as a distance filter.
///
/// The source may skip fixes closer than this to the previously delivered
/// one. Derived from the current camera altitude; a zoomed-out camera does
/// not need 5m updates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateFrequencyHint {
    /// Minimum displacement between delivered fixes, in meters.
    pub distance_filter_m: f64,
}

impl UpdateFrequencyHint {
    /// Create a hint with the given distance filter.
    pub fn meters(distance_filter_m: f64) -> Self {
        Self { distance_filter_m }
    }
}

/// Contract for a platform location service.
///
/// Events flow through the channel given to the concrete source at
/// construction; this trait only carries the control surface.
pub trait LocationSource: Send + Sync {
    /// Ask the platform for location permission.
    fn request_permission(&self);

    /// Begin delivering fixes.
    fn start(&self);

    /// Stop delivering fixes.
    fn stop(&self);

    /// Adjust how often the source should deliver fixes.
    fn set_update_frequency_hint(&self, hint: UpdateFrequencyHint);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_flag() {
        assert!(!AuthorizationState::NotDetermined.is_authorized());
        assert!(!AuthorizationState::Denied.is_authorized());
        assert!(!AuthorizationState::Restricted.is_authorized());
        assert!(AuthorizationState::AuthorizedWhenInUse.is_authorized());
        assert!(AuthorizationState::AuthorizedAlways.is_authorized());
    }

    #[test]
    fn test_error_display() {
        let err = LocationSourceError::UpdateFailed("gps glitch".to_string());
        assert!(err.to_string().contains("gps glitch"));
        assert!(LocationSourceError::AuthorizationDenied
            .to_string()
            .contains("denied"));
    }
}
