//! Maptrack CLI - demo driver for the tracking engine.
//!
//! Runs the engine against a simulated location source and a canned
//! geocoder, logging camera and address state as the route replays. A
//! short scripted interaction (pan away, then recenter) exercises the
//! follow-state machine.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use futures::future::BoxFuture;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use maptrack::address::{Address, AddressFormatPreference, LocaleProfile};
use maptrack::coord::Coordinate;
use maptrack::display::{format_altitude, format_speed};
use maptrack::engine::{EngineCommand, EngineConfig, MapEngine, MapViewState};
use maptrack::geocode::{GeocodeError, GeocodeService};
use maptrack::location::SimulatedLocationSource;
use maptrack::settings::{IniSettingsStore, MemorySettingsStore, Settings, SettingsStore};

/// Address format selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Place name headline with a composed address line.
    Standard,
    /// Full address headline with a component breakdown.
    Detailed,
    /// Locality only.
    Simple,
}

impl From<FormatArg> for AddressFormatPreference {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Standard => AddressFormatPreference::Standard,
            FormatArg::Detailed => AddressFormatPreference::Detailed,
            FormatArg::Simple => AddressFormatPreference::Simple,
        }
    }
}

/// Location tracking and map-state engine demo.
#[derive(Debug, Parser)]
#[command(name = "maptrack", version, about)]
struct Args {
    /// Latitude of the simulated route center.
    #[arg(long, default_value_t = 35.6812)]
    lat: f64,

    /// Longitude of the simulated route center.
    #[arg(long, default_value_t = 139.7671)]
    lon: f64,

    /// Number of fixes in the simulated route.
    #[arg(long, default_value_t = 90)]
    steps: usize,

    /// Meters moved per fix.
    #[arg(long, default_value_t = 25.0)]
    step_m: f64,

    /// Milliseconds between fixes.
    #[arg(long, default_value_t = 1000)]
    fix_interval_ms: u64,

    /// Locale tag for address composition (e.g. en, ja).
    #[arg(long, default_value = "en")]
    locale: String,

    /// Address display format.
    #[arg(long, value_enum, default_value = "standard")]
    format: FormatArg,

    /// Settings file path (defaults to the platform config directory).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Use a volatile in-memory settings store.
    #[arg(long)]
    ephemeral: bool,

    /// Skip the scripted pan/recenter interaction.
    #[arg(long)]
    no_script: bool,
}

/// Geocoder synthesizing addresses from the coordinate grid.
struct DemoGeocoder {
    calls: AtomicUsize,
}

impl GeocodeService for DemoGeocoder {
    fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> BoxFuture<'static, Result<Address, GeocodeError>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let address = Address {
            locality: Some(format!(
                "Block {:.3}/{:.3}",
                coordinate.latitude, coordinate.longitude
            )),
            administrative_area: Some("Demo Prefecture".to_string()),
            postal_code: Some(format!("{:03}-{:04}", call % 1000, call % 10000)),
            ..Address::default()
        };
        // A touch of latency so loading flags are observable
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            Ok(address)
        })
    }
}

fn open_settings(args: &Args) -> Result<Arc<dyn SettingsStore>, String> {
    if args.ephemeral {
        return Ok(Arc::new(MemorySettingsStore::new()));
    }
    let store = match &args.settings {
        Some(path) => IniSettingsStore::open(path),
        None => IniSettingsStore::open_default(),
    }
    .map_err(|e| e.to_string())?;
    info!(path = %store.path().display(), "Using settings file");
    Ok(Arc::new(store))
}

fn log_state(previous: &mut MapViewState, state: &MapViewState, settings: &Settings) {
    if state.follow_state != previous.follow_state {
        info!(state = %state.follow_state, "Follow state");
    }
    if state.banner != previous.banner {
        match &state.banner {
            Some(banner) => warn!(%banner, "Banner raised"),
            None => info!("Banner cleared"),
        }
    }
    if state.user_address != previous.user_address {
        if let Some(address) = &state.user_address {
            info!(
                primary = %address.primary_text,
                secondary = %address.secondary_text,
                postal = address.postal_code.as_deref().unwrap_or("-"),
                "User address"
            );
        }
    }
    if state.map_center_address != previous.map_center_address {
        if let Some(address) = &state.map_center_address {
            info!(primary = %address.primary_text, "Map center address");
        }
    }
    if let (Some(center), Some(fix)) = (state.camera.center, state.last_fix) {
        if previous.camera != state.camera {
            info!(
                %center,
                altitude = %format_altitude(state.camera.altitude_m, settings.altitude_unit()),
                heading = state.camera.heading_deg,
                speed = %format_speed(fix.speed_mps, settings.speed_unit()),
                zoom = state.zoom_index,
                "Camera"
            );
        }
    }
    *previous = state.clone();
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let store = match open_settings(&args) {
        Ok(store) => store,
        Err(error) => {
            eprintln!("Failed to open settings: {}", error);
            std::process::exit(1);
        }
    };

    let settings = Settings::new(Arc::clone(&store));
    settings.set_address_format(args.format.into());

    let center = Coordinate::new(args.lat, args.lon);
    if !center.is_valid() {
        eprintln!("Invalid route center {}", center);
        std::process::exit(1);
    }

    let route = SimulatedLocationSource::circular_route(center, args.steps, args.step_m);
    let (event_tx, event_rx) = mpsc::channel(64);
    let source = Arc::new(
        SimulatedLocationSource::new(event_tx, route)
            .with_fix_interval(Duration::from_millis(args.fix_interval_ms)),
    );

    let (engine, handle) = MapEngine::new(
        EngineConfig::with_locale(LocaleProfile::for_tag(&args.locale)),
        store,
        Arc::clone(&source) as _,
        event_rx,
        Arc::new(DemoGeocoder {
            calls: AtomicUsize::new(0),
        }),
    );

    let shutdown = CancellationToken::new();
    let engine_task = tokio::spawn(engine.run(shutdown.clone()));

    // Scripted interaction: pan ~1km east a third of the way through the
    // route, recenter two thirds through.
    if !args.no_script {
        let script_handle = handle.clone();
        let route_ms = args.fix_interval_ms * args.steps as u64;
        let pan_target = Coordinate::new(center.latitude, center.longitude + 0.012);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(route_ms / 3)).await;
            info!(%pan_target, "Script: panning away");
            script_handle
                .send(EngineCommand::MapPanned(pan_target))
                .await;

            tokio::time::sleep(Duration::from_millis(route_ms / 3)).await;
            info!("Script: recentering on user");
            script_handle.send(EngineCommand::CenterOnUser).await;
        });
    }

    let mut watch = handle.watch();
    let mut previous = MapViewState::default();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
            changed = watch.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = watch.borrow_and_update().clone();
                log_state(&mut previous, &state, &settings);
            }
        }
    }

    shutdown.cancel();
    let _ = engine_task.await;
}
