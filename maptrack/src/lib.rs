//! Maptrack - location tracking and map-state coordination engine.
//!
//! Turns a noisy, asynchronous stream of position fixes into a stable
//! camera/state model for an on-device map viewer, while resolving
//! human-readable addresses without flooding a rate-limited geocoding
//! backend.
//!
//! # Architecture
//!
//! ```text
//! LocationSource ──events──► MapEngine ──► TrackingController
//!                              │               │
//! UI commands ────────────────►│               ├─► ZoomLevelModel
//!                              │               ├─► OrientationController
//! GeocodingPipeline ◄──────────┘               └─► watch<MapViewState>
//!   (per subject)  ──► GeocodeService
//!                  ──► AddressPresenter
//! ```
//!
//! All mutable state is owned by the [`engine::MapEngine`] task; external
//! async work (debounced geocode lookups) marshals its results back onto
//! that single writer before anything is applied.

pub mod address;
pub mod coord;
pub mod display;
pub mod engine;
pub mod geocode;
pub mod location;
pub mod orientation;
pub mod settings;
pub mod zoom;
