//! Location source contract, fix types, and delivery policies.
//!
//! The platform location service is an external collaborator. This module
//! defines the boundary: the fix type with its accuracy gate, the event
//! and control contracts, the update-frequency adaptation policy, and a
//! scripted source implementation for demos and integration tests.

mod fix;
mod policy;
mod simulated;
mod source;

pub use fix::{LocationFix, MAX_HORIZONTAL_ACCURACY_M};
pub use policy::{distance_filter_for_altitude, hint_for_altitude};
pub use simulated::SimulatedLocationSource;
pub use source::{
    AuthorizationState, LocationEvent, LocationSource, LocationSourceError, UpdateFrequencyHint,
};
