//! Debounced, cancellable reverse-geocode pipeline.
//!
//! One instance per [`GeocodeSubject`]. A request schedules the lookup
//! after a debounce delay so bursts of rapidly arriving coordinates
//! coalesce into a single call; issuing a new request cancels the
//! in-flight one immediately, including inside its debounce window.
//!
//! ```text
//! request(c1) ──┐
//! request(c2) ──┤ cancel previous          ┌──────────┐
//! request(c3) ──┴──► debounce sleep ──────►│ geocoder │──► outcome channel
//!                    (cancellable)         └──────────┘        │
//!                                                              ▼
//!                                              apply() on the writer context
//! ```
//!
//! Only the most recently issued, non-superseded request may mutate
//! `result`/`loading`; a stale outcome is recognized by its generation
//! token and discarded.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::address::{
    AddressFormatPreference, AddressPresenter, FormattedAddress, LocaleProfile,
};
use crate::coord::Coordinate;

use super::{GeocodeError, GeocodeOutcome, GeocodeService, GeocodeSubject};

/// Debounce delay for user-position lookups.
pub const USER_POSITION_DEBOUNCE: Duration = Duration::from_millis(500);

/// Debounce delay for map-center lookups.
pub const MAP_CENTER_DEBOUNCE: Duration = Duration::from_millis(300);

/// Minimum displacement before the user-position subject re-resolves.
pub const MIN_DISPLACEMENT_M: f64 = 50.0;

/// Upper bound on a single geocoder call.
pub const GEOCODE_TIMEOUT: Duration = Duration::from_secs(10);

/// Tuning knobs for a pipeline instance.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Delay between a request and the lookup it schedules.
    pub debounce: Duration,
    /// Upper bound on the geocoder call.
    pub timeout: Duration,
    /// Displacement gate against the last resolved coordinate, when set.
    pub min_displacement_m: Option<f64>,
}

impl PipelineConfig {
    /// The standard configuration for a subject.
    ///
    /// The user-position subject carries the displacement gate and a
    /// longer debounce; the map-center probe reacts faster and always
    /// re-resolves.
    pub fn for_subject(subject: GeocodeSubject) -> Self {
        match subject {
            GeocodeSubject::UserPosition => Self {
                debounce: USER_POSITION_DEBOUNCE,
                timeout: GEOCODE_TIMEOUT,
                min_displacement_m: Some(MIN_DISPLACEMENT_M),
            },
            GeocodeSubject::MapCenter => Self {
                debounce: MAP_CENTER_DEBOUNCE,
                timeout: GEOCODE_TIMEOUT,
                min_displacement_m: None,
            },
        }
    }
}

/// Per-subject reverse-geocoding state machine.
pub struct GeocodingPipeline {
    subject: GeocodeSubject,
    config: PipelineConfig,
    geocoder: Arc<dyn GeocodeService>,
    outcomes: mpsc::Sender<GeocodeOutcome>,
    token: u64,
    inflight: Option<CancellationToken>,
    loading: bool,
    result: Option<FormattedAddress>,
    last_resolved: Option<Coordinate>,
}

impl std::fmt::Debug for GeocodingPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingPipeline")
            .field("subject", &self.subject)
            .field("token", &self.token)
            .field("loading", &self.loading)
            .field("has_result", &self.result.is_some())
            .finish()
    }
}

impl GeocodingPipeline {
    /// Create a pipeline with the standard configuration for `subject`.
    pub fn new(
        subject: GeocodeSubject,
        geocoder: Arc<dyn GeocodeService>,
        outcomes: mpsc::Sender<GeocodeOutcome>,
    ) -> Self {
        Self::with_config(subject, PipelineConfig::for_subject(subject), geocoder, outcomes)
    }

    /// Create a pipeline with an explicit configuration.
    pub fn with_config(
        subject: GeocodeSubject,
        config: PipelineConfig,
        geocoder: Arc<dyn GeocodeService>,
        outcomes: mpsc::Sender<GeocodeOutcome>,
    ) -> Self {
        Self {
            subject,
            config,
            geocoder,
            outcomes,
            token: 0,
            inflight: None,
            loading: false,
            result: None,
            last_resolved: None,
        }
    }

    /// The subject this pipeline resolves for.
    pub fn subject(&self) -> GeocodeSubject {
        self.subject
    }

    /// Whether a lookup is pending or in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The last successfully resolved address, if any.
    pub fn result(&self) -> Option<&FormattedAddress> {
        self.result.as_ref()
    }

    /// Anchor of the displacement gate (user-position subject only).
    pub fn last_resolved_coordinate(&self) -> Option<Coordinate> {
        self.last_resolved
    }

    /// Request a lookup for `coordinate`.
    ///
    /// Inside the displacement gate this is a complete no-op. Otherwise
    /// the in-flight request is cancelled, the generation advances, and a
    /// lookup task is scheduled after the debounce delay.
    pub fn request(&mut self, coordinate: Coordinate) {
        if let (Some(gate_m), Some(anchor)) = (self.config.min_displacement_m, self.last_resolved)
        {
            let displacement = anchor.distance_m(&coordinate);
            if displacement < gate_m {
                debug!(
                    subject = %self.subject,
                    displacement_m = displacement,
                    "Inside displacement gate, skipping lookup"
                );
                return;
            }
        }

        if let Some(inflight) = self.inflight.take() {
            inflight.cancel();
        }

        self.token += 1;
        self.loading = true;

        let cancel = CancellationToken::new();
        self.inflight = Some(cancel.clone());

        let subject = self.subject;
        let token = self.token;
        let geocoder = Arc::clone(&self.geocoder);
        let outcomes = self.outcomes.clone();
        let debounce = self.config.debounce;
        let timeout = self.config.timeout;

        tokio::spawn(async move {
            // Coalesce bursts: superseding requests cancel us here, before
            // the geocoder ever sees a call.
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(debounce) => {}
            }
            if cancel.is_cancelled() {
                return;
            }

            let lookup = tokio::time::timeout(timeout, geocoder.reverse_geocode(coordinate));
            let result = tokio::select! {
                _ = cancel.cancelled() => return,
                resolved = lookup => match resolved {
                    Ok(result) => result,
                    Err(_) => Err(GeocodeError::ServiceFailure(
                        "reverse geocode timed out".to_string(),
                    )),
                }
            };

            let _ = outcomes
                .send(GeocodeOutcome {
                    subject,
                    token,
                    coordinate,
                    result,
                })
                .await;
        });
    }

    /// Cancel the in-flight request, if any, leaving `result` untouched.
    pub fn cancel(&mut self) {
        if let Some(inflight) = self.inflight.take() {
            inflight.cancel();
            self.loading = false;
        }
    }

    /// Fold a completed lookup back into pipeline state.
    ///
    /// Outcomes from superseded requests are discarded. On success the
    /// address is formatted under the given preference and locale; on
    /// failure the previous result is retained (stale display beats a
    /// blank one).
    ///
    /// Returns true when the outcome mutated pipeline state.
    pub fn apply(
        &mut self,
        outcome: GeocodeOutcome,
        preference: AddressFormatPreference,
        locale: &LocaleProfile,
    ) -> bool {
        debug_assert_eq!(outcome.subject, self.subject);

        if outcome.token != self.token {
            debug!(
                subject = %self.subject,
                outcome_token = outcome.token,
                current_token = self.token,
                "Discarding superseded geocode outcome"
            );
            return false;
        }

        self.inflight = None;
        self.loading = false;

        match outcome.result {
            Ok(address) => {
                self.result = Some(AddressPresenter::format(&address, preference, locale));
                if self.config.min_displacement_m.is_some() {
                    self.last_resolved = Some(outcome.coordinate);
                }
            }
            Err(error) => {
                warn!(
                    subject = %self.subject,
                    error = %error,
                    "Reverse geocode failed, keeping previous address"
                );
            }
        }

        true
    }
}
