//! Follow/detached state machine and camera coordination.
//!
//! [`TrackingController`] owns every piece of mutable map state. It is a
//! plain synchronous struct; the [`MapEngine`](super::MapEngine) daemon
//! funnels all mutation through it on one task, so nothing here needs a
//! lock.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::address::{AddressFormatPreference, LocaleProfile};
use crate::coord::Coordinate;
use crate::geocode::{GeocodeOutcome, GeocodeService, GeocodeSubject, GeocodingPipeline};
use crate::location::{
    hint_for_altitude, AuthorizationState, LocationEvent, LocationFix, LocationSource,
    UpdateFrequencyHint,
};
use crate::orientation::{OrientationController, OrientationMode};
use crate::settings::{MapStyle, Settings};
use crate::zoom::ZoomLevelModel;

use super::{BannerError, CameraState, FollowState, MapViewState};

/// Pan displacement from the last fix that breaks follow mode.
pub const FOLLOW_BREAK_DISTANCE_M: f64 = 100.0;

/// How long program-driven camera moves suppress the detach transition.
///
/// Zoom buttons and recenter move the camera; the resulting pan reports
/// must not read as user panning.
pub const PROGRAMMATIC_GUARD: Duration = Duration::from_millis(500);

/// Owns follow state, camera, zoom, orientation, and both geocode
/// pipelines.
pub struct TrackingController {
    settings: Settings,
    source: Arc<dyn LocationSource>,
    locale: LocaleProfile,

    follow: FollowState,
    camera: CameraState,
    zoom: ZoomLevelModel,
    orientation: OrientationController,
    map_style: MapStyle,
    address_format: AddressFormatPreference,

    user_pipeline: GeocodingPipeline,
    map_pipeline: GeocodingPipeline,

    last_fix: Option<LocationFix>,
    banner: Option<BannerError>,
    authorized: bool,
    guard_until: Option<Instant>,
    guard_duration: Duration,
    last_hint: Option<UpdateFrequencyHint>,
}

impl TrackingController {
    /// Build a controller, seeding first-launch defaults and restoring the
    /// persisted zoom, style, orientation, and address format.
    pub fn new(
        settings: Settings,
        source: Arc<dyn LocationSource>,
        geocoder: Arc<dyn GeocodeService>,
        locale: LocaleProfile,
        outcomes: mpsc::Sender<GeocodeOutcome>,
    ) -> Self {
        settings.seed_first_launch();

        let zoom = ZoomLevelModel::new(settings.current_zoom_index());
        let orientation = OrientationController::new(settings.current_orientation_mode());
        let camera = CameraState {
            center: None,
            altitude_m: zoom.current_altitude(),
            heading_deg: 0.0,
        };

        let user_pipeline = GeocodingPipeline::new(
            GeocodeSubject::UserPosition,
            Arc::clone(&geocoder),
            outcomes.clone(),
        );
        let map_pipeline =
            GeocodingPipeline::new(GeocodeSubject::MapCenter, geocoder, outcomes);

        Self {
            map_style: settings.current_map_style(),
            address_format: settings.address_format(),
            settings,
            source,
            locale,
            follow: FollowState::Following,
            camera,
            zoom,
            orientation,
            user_pipeline,
            map_pipeline,
            last_fix: None,
            banner: None,
            authorized: false,
            guard_until: None,
            guard_duration: PROGRAMMATIC_GUARD,
            last_hint: None,
        }
    }

    /// Override the programmatic guard window (tests).
    #[cfg(test)]
    pub(crate) fn with_guard_duration(mut self, duration: Duration) -> Self {
        self.guard_duration = duration;
        self
    }

    /// Request permission and start fix delivery.
    pub fn start_source(&self) {
        self.source.request_permission();
        self.source.start();
    }

    /// Stop fix delivery.
    pub fn stop_source(&self) {
        self.source.stop();
    }

    /// Current follow state.
    pub fn follow_state(&self) -> FollowState {
        self.follow
    }

    /// Dispatch a location source event.
    pub fn handle_location_event(&mut self, event: LocationEvent) {
        match event {
            LocationEvent::Fix(fix) => self.handle_fix(fix),
            LocationEvent::AuthorizationChanged(state) => self.handle_authorization(state),
            LocationEvent::UpdatesPaused => info!("Location updates paused"),
            LocationEvent::UpdatesResumed => info!("Location updates resumed"),
            LocationEvent::Failed(error) => self.handle_source_failure(error),
        }
    }

    /// Fold an accepted fix into controller state.
    ///
    /// In follow mode the camera recenters and a user-position lookup is
    /// requested; detached, only the stored last-known state updates.
    pub fn handle_fix(&mut self, fix: LocationFix) {
        self.last_fix = Some(fix);

        // The related success clears a fix-failure banner; permission and
        // service banners persist until a positive authorization event.
        if matches!(self.banner, Some(BannerError::FixUpdateFailure(_))) {
            self.banner = None;
        }

        if self.follow == FollowState::Following {
            self.camera.center = Some(fix.coordinate);
            self.camera.altitude_m = self.zoom.current_altitude();
            self.camera.heading_deg = self.orientation.heading_for_camera(&fix);
            self.user_pipeline.request(fix.coordinate);
        }

        self.push_frequency_hint();
    }

    /// React to an externally reported map pan.
    ///
    /// A pan farther than [`FOLLOW_BREAK_DISTANCE_M`] from the last fix
    /// breaks follow mode, unless it falls inside the programmatic guard
    /// window. Detached pans move the probe.
    pub fn handle_map_pan(&mut self, center: Coordinate) {
        match self.follow {
            FollowState::Following => {
                if self.in_programmatic_guard() {
                    debug!(%center, "Pan inside programmatic guard, follow kept");
                    return;
                }

                let Some(fix) = self.last_fix else {
                    debug!(%center, "Pan before first fix, follow kept");
                    return;
                };

                let displacement = fix.coordinate.distance_m(&center);
                if displacement > FOLLOW_BREAK_DISTANCE_M {
                    info!(
                        displacement_m = displacement,
                        "Map pan broke follow mode"
                    );
                    self.follow = FollowState::Detached;
                    self.camera.center = Some(center);
                    self.map_pipeline.request(center);
                }
            }
            FollowState::Detached => {
                self.camera.center = Some(center);
                self.map_pipeline.request(center);
            }
        }
    }

    /// Step one zoom level toward the ground.
    pub fn zoom_in(&mut self) {
        self.arm_programmatic_guard();
        if self.zoom.zoom_in() {
            self.after_zoom_change();
        }
    }

    /// Step one zoom level away from the ground.
    pub fn zoom_out(&mut self) {
        self.arm_programmatic_guard();
        if self.zoom.zoom_out() {
            self.after_zoom_change();
        }
    }

    /// Jump to a zoom index (clamped).
    pub fn set_zoom_index(&mut self, index: usize) {
        self.arm_programmatic_guard();
        self.zoom.set_zoom_index(index);
        self.after_zoom_change();
    }

    /// Flip north-up/heading-up and recompute the camera heading
    /// immediately from the most recent fix (or keep the camera heading
    /// when none is known yet).
    pub fn toggle_orientation(&mut self) {
        let mode = self.orientation.toggle();
        self.settings.set_current_orientation_mode(mode);

        self.camera.heading_deg = match (mode, self.last_fix) {
            (OrientationMode::NorthUp, _) => 0.0,
            (OrientationMode::HeadingUp, Some(fix)) => self.orientation.heading_for_camera(&fix),
            (OrientationMode::HeadingUp, None) => self.camera.heading_deg,
        };
    }

    /// Recenter on the user and resume following.
    ///
    /// Re-applies the persisted default zoom index; orientation is left
    /// untouched.
    pub fn center_on_user(&mut self) {
        self.arm_programmatic_guard();

        if self.follow == FollowState::Detached {
            info!("Recentered on user, following resumed");
        }
        self.follow = FollowState::Following;

        self.zoom.set_zoom_index(self.settings.default_zoom_index());
        self.after_zoom_change();

        if let Some(fix) = self.last_fix {
            self.camera.center = Some(fix.coordinate);
            self.camera.heading_deg = self.orientation.heading_for_camera(&fix);
            self.user_pipeline.request(fix.coordinate);
        }
    }

    /// Change the address format preference and persist it.
    ///
    /// Already resolved addresses keep their old formatting until the next
    /// successful lookup.
    pub fn set_address_format(&mut self, preference: AddressFormatPreference) {
        self.address_format = preference;
        self.settings.set_address_format(preference);
    }

    /// Change the map style and persist it.
    pub fn set_map_style(&mut self, style: MapStyle) {
        self.map_style = style;
        self.settings.set_current_map_style(style);
    }

    /// Fold a completed geocode lookup into the owning pipeline.
    pub fn handle_geocode_outcome(&mut self, outcome: GeocodeOutcome) {
        let pipeline = match outcome.subject {
            GeocodeSubject::UserPosition => &mut self.user_pipeline,
            GeocodeSubject::MapCenter => &mut self.map_pipeline,
        };
        pipeline.apply(outcome, self.address_format, &self.locale);
    }

    /// Apply an authorization change.
    ///
    /// Denial raises a persistent banner; only a subsequent authorized
    /// state clears permission/service banners.
    pub fn handle_authorization(&mut self, state: AuthorizationState) {
        self.authorized = state.is_authorized();

        match state {
            AuthorizationState::Denied => {
                self.banner = Some(BannerError::PermissionDenied);
            }
            AuthorizationState::Restricted => {
                self.banner = Some(BannerError::PermissionRestricted);
            }
            AuthorizationState::NotDetermined => {}
            _ => {
                if matches!(
                    self.banner,
                    Some(BannerError::PermissionDenied)
                        | Some(BannerError::PermissionRestricted)
                        | Some(BannerError::ServiceUnavailable)
                ) {
                    self.banner = None;
                }
            }
        }
    }

    /// Apply a source failure to banner state.
    pub fn handle_source_failure(&mut self, error: crate::location::LocationSourceError) {
        use crate::location::LocationSourceError;

        warn!(error = %error, "Location source failure");
        match error {
            LocationSourceError::AuthorizationDenied => {
                self.authorized = false;
                self.banner = Some(BannerError::PermissionDenied);
            }
            LocationSourceError::ServicesDisabled => {
                self.banner = Some(BannerError::ServiceUnavailable);
            }
            LocationSourceError::UpdateFailed(reason) => {
                self.banner = Some(BannerError::FixUpdateFailure(reason));
            }
        }
    }

    /// Snapshot everything the UI binds to.
    pub fn snapshot(&self) -> MapViewState {
        MapViewState {
            follow_state: self.follow,
            camera: self.camera,
            zoom_index: self.zoom.index(),
            orientation_mode: self.orientation.mode(),
            map_style: self.map_style,
            user_rotation_enabled: self.orientation.is_user_rotation_enabled(),
            user_address: self.user_pipeline.result().cloned(),
            user_address_loading: self.user_pipeline.is_loading(),
            map_center_address: self.map_pipeline.result().cloned(),
            map_center_address_loading: self.map_pipeline.is_loading(),
            banner: self.banner.clone(),
            authorized: self.authorized,
            last_fix: self.last_fix,
        }
    }

    fn after_zoom_change(&mut self) {
        self.camera.altitude_m = self.zoom.current_altitude();
        self.settings.set_current_zoom_index(self.zoom.index());
        self.push_frequency_hint();
    }

    fn arm_programmatic_guard(&mut self) {
        self.guard_until = Some(Instant::now() + self.guard_duration);
    }

    fn in_programmatic_guard(&self) -> bool {
        self.guard_until
            .map(|deadline| Instant::now() < deadline)
            .unwrap_or(false)
    }

    /// Push the update-frequency hint when its bucket changed.
    fn push_frequency_hint(&mut self) {
        let hint = hint_for_altitude(self.camera.altitude_m);
        if self.last_hint != Some(hint) {
            self.source.set_update_frequency_hint(hint);
            self.last_hint = Some(hint);
        }
    }
}

impl std::fmt::Debug for TrackingController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackingController")
            .field("follow", &self.follow)
            .field("camera", &self.camera)
            .field("zoom_index", &self.zoom.index())
            .field("orientation", &self.orientation.mode())
            .field("authorized", &self.authorized)
            .field("banner", &self.banner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::*;
    use crate::address::Address;
    use crate::geocode::tests::MockGeocoder;
    use crate::settings::MemorySettingsStore;

    /// Location source that records control calls.
    #[derive(Default)]
    struct RecordingSource {
        hints: Mutex<Vec<UpdateFrequencyHint>>,
        permission_requests: AtomicUsize,
        starts: AtomicUsize,
        stops: AtomicUsize,
    }

    impl LocationSource for RecordingSource {
        fn request_permission(&self) {
            self.permission_requests.fetch_add(1, Ordering::SeqCst);
        }

        fn start(&self) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn stop(&self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }

        fn set_update_frequency_hint(&self, hint: UpdateFrequencyHint) {
            self.hints.lock().push(hint);
        }
    }

    struct Harness {
        controller: TrackingController,
        source: Arc<RecordingSource>,
        geocoder: Arc<MockGeocoder>,
        outcomes: mpsc::Receiver<GeocodeOutcome>,
        settings: Settings,
    }

    fn harness() -> Harness {
        let settings = Settings::new(Arc::new(MemorySettingsStore::new()));
        let source = Arc::new(RecordingSource::default());
        let geocoder = Arc::new(MockGeocoder::with_address(Address {
            locality: Some("千代田区".to_string()),
            administrative_area: Some("東京都".to_string()),
            ..Address::default()
        }));
        let (tx, rx) = mpsc::channel(32);

        let controller = TrackingController::new(
            settings.clone(),
            Arc::clone(&source) as Arc<dyn LocationSource>,
            Arc::clone(&geocoder) as Arc<dyn GeocodeService>,
            LocaleProfile::for_tag("ja"),
            tx,
        );

        Harness {
            controller,
            source,
            geocoder,
            outcomes: rx,
            settings,
        }
    }

    fn fix_at(lat: f64, lon: f64) -> LocationFix {
        LocationFix::at(Coordinate::new(lat, lon))
            .with_horizontal_accuracy(10.0)
            .with_course(45.0)
            .with_speed(3.0)
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_state_follows_and_restores_settings() {
        let settings = Settings::new(Arc::new(MemorySettingsStore::new()));
        settings.set_current_zoom_index(2);
        settings.set_current_orientation_mode(OrientationMode::HeadingUp);

        let (tx, _rx) = mpsc::channel(8);
        let controller = TrackingController::new(
            settings,
            Arc::new(RecordingSource::default()),
            Arc::new(MockGeocoder::with_address(Address::default())),
            LocaleProfile::default(),
            tx,
        );

        let state = controller.snapshot();
        assert_eq!(state.follow_state, FollowState::Following);
        assert_eq!(state.zoom_index, 2);
        assert_eq!(state.orientation_mode, OrientationMode::HeadingUp);
        assert_eq!(state.camera.altitude_m, 1_000.0);
        assert!(state.user_rotation_enabled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_launch_seeded_by_constructor() {
        let h = harness();
        assert!(!h.settings.is_first_launch());
        assert_eq!(h.controller.snapshot().zoom_index, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fix_recenters_and_requests_geocode_when_following() {
        let mut h = harness();

        h.controller.handle_fix(fix_at(35.68, 139.76));

        let state = h.controller.snapshot();
        assert_eq!(
            state.camera.center,
            Some(Coordinate::new(35.68, 139.76))
        );
        assert!(state.user_address_loading);

        let outcome = h.outcomes.recv().await.expect("lookup scheduled");
        assert_eq!(outcome.subject, GeocodeSubject::UserPosition);
        assert_eq!(h.geocoder.call_count(), 1);

        h.controller.handle_geocode_outcome(outcome);
        let state = h.controller.snapshot();
        assert!(!state.user_address_loading);
        assert_eq!(
            state.user_address.map(|a| a.primary_text),
            Some("東京都 千代田区".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_detached_fix_updates_last_known_but_not_camera() {
        let mut h = harness();
        h.controller.handle_fix(fix_at(35.0, 139.0));
        let _ = h.outcomes.recv().await;

        // Break follow with a far pan
        tokio::time::advance(PROGRAMMATIC_GUARD).await;
        h.controller.handle_map_pan(Coordinate::new(35.1, 139.0));
        assert_eq!(h.controller.follow_state(), FollowState::Detached);

        let camera_before = h.controller.snapshot().camera;
        h.controller.handle_fix(fix_at(36.0, 140.0));

        let state = h.controller.snapshot();
        assert_eq!(state.camera.center, camera_before.center);
        assert_eq!(
            state.last_fix.map(|f| f.coordinate),
            Some(Coordinate::new(36.0, 140.0))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_far_pan_breaks_follow_and_probes_map_center() {
        let mut h = harness();
        h.controller.handle_fix(fix_at(35.0, 139.0));
        let _ = h.outcomes.recv().await;

        tokio::time::advance(PROGRAMMATIC_GUARD).await;
        // ~1.1km north
        h.controller.handle_map_pan(Coordinate::new(35.01, 139.0));

        assert_eq!(h.controller.follow_state(), FollowState::Detached);
        let outcome = h.outcomes.recv().await.expect("probe lookup");
        assert_eq!(outcome.subject, GeocodeSubject::MapCenter);
    }

    #[tokio::test(start_paused = true)]
    async fn test_near_pan_keeps_following() {
        let mut h = harness();
        h.controller.handle_fix(fix_at(35.0, 139.0));
        let _ = h.outcomes.recv().await;

        tokio::time::advance(PROGRAMMATIC_GUARD).await;
        // ~55m north: inside the follow-break distance
        h.controller.handle_map_pan(Coordinate::new(35.0005, 139.0));

        assert_eq!(h.controller.follow_state(), FollowState::Following);
    }

    #[tokio::test(start_paused = true)]
    async fn test_programmatic_guard_suppresses_detach() {
        let mut h = harness();
        h.controller.handle_fix(fix_at(35.0, 139.0));
        let _ = h.outcomes.recv().await;

        // Zoom arms the guard; the resulting far pan report must not detach
        h.controller.zoom_in();
        h.controller.handle_map_pan(Coordinate::new(35.01, 139.0));
        assert_eq!(h.controller.follow_state(), FollowState::Following);

        // Once the guard expires the same pan detaches
        tokio::time::advance(PROGRAMMATIC_GUARD + Duration::from_millis(1)).await;
        h.controller.handle_map_pan(Coordinate::new(35.01, 139.0));
        assert_eq!(h.controller.follow_state(), FollowState::Detached);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pan_before_first_fix_keeps_following() {
        let mut h = harness();
        tokio::time::advance(PROGRAMMATIC_GUARD).await;
        h.controller.handle_map_pan(Coordinate::new(35.0, 139.0));
        assert_eq!(h.controller.follow_state(), FollowState::Following);
    }

    #[tokio::test(start_paused = true)]
    async fn test_center_on_user_restores_default_zoom_and_follow() {
        let mut h = harness();
        h.settings.set_default_zoom_index(3);
        h.controller.handle_fix(fix_at(35.0, 139.0));
        let _ = h.outcomes.recv().await;

        // Detach and wander off the default zoom
        tokio::time::advance(PROGRAMMATIC_GUARD).await;
        h.controller.handle_map_pan(Coordinate::new(35.01, 139.0));
        h.controller.zoom_out();
        h.controller.zoom_out();
        assert_eq!(h.controller.follow_state(), FollowState::Detached);

        let orientation_before = h.controller.snapshot().orientation_mode;
        h.controller.center_on_user();

        let state = h.controller.snapshot();
        assert_eq!(state.follow_state, FollowState::Following);
        assert_eq!(state.zoom_index, 3, "default, not the ad-hoc current");
        assert_eq!(state.camera.center, Some(Coordinate::new(35.0, 139.0)));
        assert_eq!(state.orientation_mode, orientation_before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zoom_changes_persist_and_move_camera_altitude() {
        let mut h = harness();
        h.controller.zoom_in();

        let state = h.controller.snapshot();
        assert_eq!(state.zoom_index, 4);
        assert_eq!(state.camera.altitude_m, 5_000.0);
        assert_eq!(h.settings.current_zoom_index(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_orientation_recomputes_heading_immediately() {
        let mut h = harness();
        h.controller.handle_fix(fix_at(35.0, 139.0));
        let _ = h.outcomes.recv().await;
        assert_eq!(h.controller.snapshot().camera.heading_deg, 0.0);

        h.controller.toggle_orientation();
        let state = h.controller.snapshot();
        assert_eq!(state.orientation_mode, OrientationMode::HeadingUp);
        assert_eq!(state.camera.heading_deg, 45.0, "course applied immediately");
        assert_eq!(
            h.settings.current_orientation_mode(),
            OrientationMode::HeadingUp
        );

        h.controller.toggle_orientation();
        assert_eq!(h.controller.snapshot().camera.heading_deg, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_frequency_hint_follows_altitude_buckets() {
        let mut h = harness();

        // Initial fix at the 10km default altitude: 20m filter
        h.controller.handle_fix(fix_at(35.0, 139.0));
        assert_eq!(
            h.source.hints.lock().last().map(|h| h.distance_filter_m),
            Some(20.0)
        );

        // Zoom to 500m: 5m filter
        h.controller.set_zoom_index(1);
        assert_eq!(
            h.source.hints.lock().last().map(|h| h.distance_filter_m),
            Some(5.0)
        );

        // A further fix at the same altitude pushes nothing new
        let pushes = h.source.hints.lock().len();
        h.controller.handle_fix(fix_at(35.001, 139.0));
        assert_eq!(h.source.hints.lock().len(), pushes);
    }

    #[tokio::test(start_paused = true)]
    async fn test_denied_authorization_raises_persistent_banner() {
        let mut h = harness();
        h.controller.handle_authorization(AuthorizationState::Denied);

        let state = h.controller.snapshot();
        assert!(!state.authorized);
        assert_eq!(state.banner, Some(BannerError::PermissionDenied));

        // A successful fix does not clear a permission banner
        h.controller.handle_fix(fix_at(35.0, 139.0));
        assert_eq!(
            h.controller.snapshot().banner,
            Some(BannerError::PermissionDenied)
        );

        // A positive authorization event does
        h.controller
            .handle_authorization(AuthorizationState::AuthorizedWhenInUse);
        let state = h.controller.snapshot();
        assert!(state.authorized);
        assert_eq!(state.banner, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fix_failure_banner_clears_on_next_fix() {
        let mut h = harness();
        h.controller
            .handle_source_failure(crate::location::LocationSourceError::UpdateFailed(
                "gps glitch".to_string(),
            ));
        assert!(matches!(
            h.controller.snapshot().banner,
            Some(BannerError::FixUpdateFailure(_))
        ));

        h.controller.handle_fix(fix_at(35.0, 139.0));
        assert_eq!(h.controller.snapshot().banner, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_services_disabled_banner_survives_fixes() {
        let mut h = harness();
        h.controller
            .handle_source_failure(crate::location::LocationSourceError::ServicesDisabled);

        h.controller.handle_fix(fix_at(35.0, 139.0));
        assert_eq!(
            h.controller.snapshot().banner,
            Some(BannerError::ServiceUnavailable)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_source_requests_permission_and_starts() {
        let h = harness();
        h.controller.start_source();
        assert_eq!(h.source.permission_requests.load(Ordering::SeqCst), 1);
        assert_eq!(h.source.starts.load(Ordering::SeqCst), 1);

        h.controller.stop_source();
        assert_eq!(h.source.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_address_format_persists() {
        let mut h = harness();
        h.controller
            .set_address_format(AddressFormatPreference::Simple);
        assert_eq!(h.settings.address_format(), AddressFormatPreference::Simple);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_map_style_persists() {
        let mut h = harness();
        h.controller.set_map_style(MapStyle::Satellite);
        assert_eq!(h.settings.current_map_style(), MapStyle::Satellite);
        assert_eq!(h.controller.snapshot().map_style, MapStyle::Satellite);
    }

    #[tokio::test(start_paused = true)]
    async fn test_guard_duration_override() {
        let settings = Settings::new(Arc::new(MemorySettingsStore::new()));
        let (tx, mut rx) = mpsc::channel(8);
        let mut controller = TrackingController::new(
            settings,
            Arc::new(RecordingSource::default()),
            Arc::new(MockGeocoder::with_address(Address::default())),
            LocaleProfile::default(),
            tx,
        )
        .with_guard_duration(Duration::from_secs(60));

        controller.handle_fix(fix_at(35.0, 139.0));
        let _ = rx.recv().await;

        controller.zoom_in();
        tokio::time::advance(Duration::from_secs(30)).await;
        controller.handle_map_pan(Coordinate::new(35.01, 139.0));
        assert_eq!(controller.follow_state(), FollowState::Following);
    }
}
