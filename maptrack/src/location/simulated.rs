//! Scripted location source for demos and integration tests.
//!
//! Replays a fixed route of position fixes on a timer, behaving like a
//! well-mannered platform source: authorization is granted on request,
//! fixes failing the accuracy gate are dropped before delivery, and the
//! update-frequency hint thins out fixes that moved less than the filter.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::coord::Coordinate;

use super::fix::LocationFix;
use super::source::{
    AuthorizationState, LocationEvent, LocationSource, UpdateFrequencyHint,
};

/// Default delay between replayed fixes.
const DEFAULT_FIX_INTERVAL: Duration = Duration::from_millis(1000);

/// A location source that replays a scripted route.
pub struct SimulatedLocationSource {
    events: mpsc::Sender<LocationEvent>,
    route: Vec<LocationFix>,
    fix_interval: Duration,
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    replay: Option<CancellationToken>,
    distance_filter_m: f64,
}

impl SimulatedLocationSource {
    /// Create a source that will replay `route` onto `events`.
    pub fn new(events: mpsc::Sender<LocationEvent>, route: Vec<LocationFix>) -> Self {
        Self {
            events,
            route,
            fix_interval: DEFAULT_FIX_INTERVAL,
            inner: Arc::new(Mutex::new(Inner {
                replay: None,
                distance_filter_m: 0.0,
            })),
        }
    }

    /// Set the delay between replayed fixes.
    pub fn with_fix_interval(mut self, interval: Duration) -> Self {
        self.fix_interval = interval;
        self
    }

    /// Build a gently curving city-scale route around a starting point.
    ///
    /// Each step moves roughly `step_m` meters; useful for demos.
    pub fn circular_route(center: Coordinate, steps: usize, step_m: f64) -> Vec<LocationFix> {
        let radius_deg = (step_m * steps as f64) / (2.0 * std::f64::consts::PI * 111_320.0);
        (0..steps)
            .map(|i| {
                let angle = (i as f64 / steps as f64) * 2.0 * std::f64::consts::PI;
                let lat = center.latitude + radius_deg * angle.sin();
                let lon = center.longitude + radius_deg * angle.cos();
                let course = crate::coord::normalize_degrees(angle.to_degrees() + 90.0);
                LocationFix::at(Coordinate::new(lat, lon))
                    .with_horizontal_accuracy(10.0)
                    .with_course(course)
                    .with_speed(step_m)
            })
            .collect()
    }
}

impl LocationSource for SimulatedLocationSource {
    fn request_permission(&self) {
        // The simulated user always says yes.
        let _ = self
            .events
            .try_send(LocationEvent::AuthorizationChanged(
                AuthorizationState::AuthorizedWhenInUse,
            ));
    }

    fn start(&self) {
        let mut inner = self.inner.lock();
        if inner.replay.is_some() {
            return;
        }

        let cancel = CancellationToken::new();
        inner.replay = Some(cancel.clone());
        drop(inner);

        let events = self.events.clone();
        let route = self.route.clone();
        let interval = self.fix_interval;
        let shared = Arc::clone(&self.inner);

        tokio::spawn(async move {
            let mut last_delivered: Option<Coordinate> = None;

            for fix in route {
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(interval) => {}
                }

                if !fix.passes_accuracy_gate() {
                    debug!(
                        accuracy_m = fix.horizontal_accuracy_m,
                        "Dropping fix outside accuracy gate"
                    );
                    continue;
                }

                let filter = shared.lock().distance_filter_m;
                if let Some(last) = last_delivered {
                    if last.distance_m(&fix.coordinate) < filter {
                        continue;
                    }
                }

                last_delivered = Some(fix.coordinate);
                if events.send(LocationEvent::Fix(fix)).await.is_err() {
                    return;
                }
            }

            let _ = events.send(LocationEvent::UpdatesPaused).await;
        });
    }

    fn stop(&self) {
        let mut inner = self.inner.lock();
        if let Some(replay) = inner.replay.take() {
            replay.cancel();
        }
    }

    fn set_update_frequency_hint(&self, hint: UpdateFrequencyHint) {
        self.inner.lock().distance_filter_m = hint.distance_filter_m;
        debug!(distance_filter_m = hint.distance_filter_m, "Update frequency hint applied");
    }
}
