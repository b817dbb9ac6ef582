//! Single-writer engine daemon.
//!
//! [`MapEngine`] is the long-running task that owns the
//! [`TrackingController`]. It selects over the UI command channel, the
//! location event channel, and the geocode outcome channel, applies each
//! message synchronously, and publishes a fresh [`MapViewState`] snapshot
//! after every mutation. Because nothing else touches controller state,
//! the whole engine runs lock-free.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::address::LocaleProfile;
use crate::geocode::{GeocodeOutcome, GeocodeService};
use crate::location::{LocationEvent, LocationSource};
use crate::settings::{Settings, SettingsStore};

use super::controller::TrackingController;
use super::{EngineCommand, MapViewState};

/// Default capacity of the UI command channel.
pub const DEFAULT_COMMAND_CAPACITY: usize = 64;

/// Default capacity of the geocode outcome channel.
pub const DEFAULT_OUTCOME_CAPACITY: usize = 32;

/// Engine construction parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Locale driving address composition.
    pub locale: LocaleProfile,
    /// UI command channel capacity.
    pub command_capacity: usize,
    /// Geocode outcome channel capacity.
    pub outcome_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            locale: LocaleProfile::default(),
            command_capacity: DEFAULT_COMMAND_CAPACITY,
            outcome_capacity: DEFAULT_OUTCOME_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Config with the given locale and default capacities.
    pub fn with_locale(locale: LocaleProfile) -> Self {
        Self {
            locale,
            ..Default::default()
        }
    }
}

/// Cloneable handle for driving a running engine.
#[derive(Clone)]
pub struct EngineHandle {
    commands: mpsc::Sender<EngineCommand>,
    state: watch::Receiver<MapViewState>,
}

impl EngineHandle {
    /// Send a command to the engine.
    ///
    /// Returns false when the engine has shut down.
    pub async fn send(&self, command: EngineCommand) -> bool {
        self.commands.send(command).await.is_ok()
    }

    /// Latest published snapshot.
    pub fn state(&self) -> MapViewState {
        self.state.borrow().clone()
    }

    /// Subscribe to snapshot updates.
    pub fn watch(&self) -> watch::Receiver<MapViewState> {
        self.state.clone()
    }
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle").finish()
    }
}

/// The single-writer daemon owning all tracking state.
pub struct MapEngine {
    controller: TrackingController,
    commands: mpsc::Receiver<EngineCommand>,
    location_events: mpsc::Receiver<LocationEvent>,
    outcomes: mpsc::Receiver<GeocodeOutcome>,
    state_tx: watch::Sender<MapViewState>,
}

impl MapEngine {
    /// Assemble an engine and its handle.
    ///
    /// `location_events` is the receiving end of the channel the source
    /// was constructed with; the engine becomes its single consumer.
    pub fn new(
        config: EngineConfig,
        settings_store: Arc<dyn SettingsStore>,
        source: Arc<dyn LocationSource>,
        location_events: mpsc::Receiver<LocationEvent>,
        geocoder: Arc<dyn GeocodeService>,
    ) -> (Self, EngineHandle) {
        let (command_tx, command_rx) = mpsc::channel(config.command_capacity);
        let (outcome_tx, outcome_rx) = mpsc::channel(config.outcome_capacity);

        let controller = TrackingController::new(
            Settings::new(settings_store),
            source,
            geocoder,
            config.locale,
            outcome_tx,
        );

        let (state_tx, state_rx) = watch::channel(controller.snapshot());

        let engine = Self {
            controller,
            commands: command_rx,
            location_events,
            outcomes: outcome_rx,
            state_tx,
        };
        let handle = EngineHandle {
            commands: command_tx,
            state: state_rx,
        };

        (engine, handle)
    }

    /// Run until the shutdown token fires.
    ///
    /// Starts the location source on entry and stops it on exit.
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!("Tracking engine started");
        self.controller.start_source();
        self.publish();

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Tracking engine shutting down");
                    break;
                }
                Some(command) = self.commands.recv() => {
                    self.handle_command(command);
                    self.publish();
                }
                Some(event) = self.location_events.recv() => {
                    self.controller.handle_location_event(event);
                    self.publish();
                }
                Some(outcome) = self.outcomes.recv() => {
                    self.controller.handle_geocode_outcome(outcome);
                    self.publish();
                }
            }
        }

        self.controller.stop_source();
    }

    fn handle_command(&mut self, command: EngineCommand) {
        debug!(?command, "Engine command");
        match command {
            EngineCommand::ZoomIn => self.controller.zoom_in(),
            EngineCommand::ZoomOut => self.controller.zoom_out(),
            EngineCommand::SetZoomIndex(index) => self.controller.set_zoom_index(index),
            EngineCommand::ToggleOrientation => self.controller.toggle_orientation(),
            EngineCommand::CenterOnUser => self.controller.center_on_user(),
            EngineCommand::MapPanned(center) => self.controller.handle_map_pan(center),
            EngineCommand::SetAddressFormat(preference) => {
                self.controller.set_address_format(preference)
            }
            EngineCommand::SetMapStyle(style) => self.controller.set_map_style(style),
        }
    }

    fn publish(&self) {
        // Watch send only fails when every handle is gone; the engine
        // keeps running on the shutdown token either way.
        let _ = self.state_tx.send(self.controller.snapshot());
    }
}

impl std::fmt::Debug for MapEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapEngine")
            .field("controller", &self.controller)
            .finish()
    }
}
