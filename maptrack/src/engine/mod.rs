//! Tracking engine: follow-state machine and single-writer daemon.
//!
//! All mutable map state lives behind one writer, the [`MapEngine`] task.
//! UI commands, location events, and completed geocode lookups arrive on
//! channels; after each mutation the engine publishes a [`MapViewState`]
//! snapshot on a watch channel for the camera/UI binding.
//!
//! # Architecture
//!
//! ```text
//!  UI commands ──────────┐
//!  LocationSource events ┼──► MapEngine ──► TrackingController ──► watch<MapViewState>
//!  Geocode outcomes ─────┘   (select loop)  (all state, sync)
//! ```

mod controller;
mod daemon;

pub use controller::{TrackingController, FOLLOW_BREAK_DISTANCE_M, PROGRAMMATIC_GUARD};
pub use daemon::{EngineConfig, EngineHandle, MapEngine};

use thiserror::Error;

use crate::address::{AddressFormatPreference, FormattedAddress};
use crate::coord::Coordinate;
use crate::location::LocationFix;
use crate::orientation::OrientationMode;
use crate::settings::MapStyle;

/// Whether the camera tracks the live position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FollowState {
    /// The camera recenters on every accepted fix.
    #[default]
    Following,
    /// The camera stays put under user control.
    Detached,
}

impl std::fmt::Display for FollowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FollowState::Following => write!(f, "following"),
            FollowState::Detached => write!(f, "detached"),
        }
    }
}

/// Camera parameters produced toward the map binding.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraState {
    /// Camera center; unset until the first fix or pan arrives.
    pub center: Option<Coordinate>,
    /// Camera altitude in meters (from the zoom table).
    pub altitude_m: f64,
    /// Camera heading in degrees from true north.
    pub heading_deg: f64,
}

/// Persistent, user-visible failure state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BannerError {
    /// The user denied location access.
    #[error("location access denied")]
    PermissionDenied,

    /// Location access is blocked by device policy.
    #[error("location access restricted")]
    PermissionRestricted,

    /// Location services are unavailable system-wide.
    #[error("location services unavailable")]
    ServiceUnavailable,

    /// Fix delivery failed.
    #[error("location update failed: {0}")]
    FixUpdateFailure(String),
}

/// Point-in-time snapshot of everything the UI binds to.
#[derive(Debug, Clone, Default)]
pub struct MapViewState {
    /// Follow/detached state.
    pub follow_state: FollowState,
    /// Camera center, altitude, and heading.
    pub camera: CameraState,
    /// Active zoom index.
    pub zoom_index: usize,
    /// Active orientation mode.
    pub orientation_mode: OrientationMode,
    /// Active map style.
    pub map_style: MapStyle,
    /// Whether gesture rotation is enabled.
    pub user_rotation_enabled: bool,
    /// Resolved address for the user position.
    pub user_address: Option<FormattedAddress>,
    /// Whether a user-position lookup is pending.
    pub user_address_loading: bool,
    /// Resolved address for the map-center probe.
    pub map_center_address: Option<FormattedAddress>,
    /// Whether a map-center lookup is pending.
    pub map_center_address_loading: bool,
    /// Persistent error banner, if any.
    pub banner: Option<BannerError>,
    /// Whether location access is currently authorized.
    pub authorized: bool,
    /// Most recent accepted fix.
    pub last_fix: Option<LocationFix>,
}

/// Commands from the UI layer, applied on the engine's writer context.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Step one zoom level toward the ground.
    ZoomIn,
    /// Step one zoom level away from the ground.
    ZoomOut,
    /// Jump to a zoom index (clamped).
    SetZoomIndex(usize),
    /// Flip north-up/heading-up.
    ToggleOrientation,
    /// Recenter on the user and resume following.
    CenterOnUser,
    /// The map was panned to a new center.
    MapPanned(Coordinate),
    /// Change the address format preference.
    SetAddressFormat(AddressFormatPreference),
    /// Change the map style.
    SetMapStyle(MapStyle),
}
