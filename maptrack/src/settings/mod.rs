//! Persisted user settings.
//!
//! The store is a flat string-keyed contract: enums persist as their
//! string tag, the zoom index as an integer, booleans as booleans. The
//! typed [`Settings`] facade layers key names, parsing, and compiled-in
//! fallbacks over any [`SettingsStore`] backend.

mod ini_store;
mod memory;

pub use ini_store::{IniSettingsStore, SettingsError};
pub use memory::MemorySettingsStore;

use std::sync::Arc;

use tracing::info;

use crate::address::AddressFormatPreference;
use crate::display::{AltitudeUnit, SpeedUnit};
use crate::orientation::OrientationMode;
use crate::zoom::MAX_ZOOM_INDEX;

/// Key for the active zoom index.
pub const KEY_CURRENT_ZOOM_INDEX: &str = "current.zoom_index";
/// Key for the active map style.
pub const KEY_CURRENT_MAP_STYLE: &str = "current.map_style";
/// Key for the active orientation mode.
pub const KEY_CURRENT_ORIENTATION: &str = "current.orientation_mode";
/// Key for the default zoom index applied by recentering.
pub const KEY_DEFAULT_ZOOM_INDEX: &str = "default.zoom_index";
/// Key for the default map style.
pub const KEY_DEFAULT_MAP_STYLE: &str = "default.map_style";
/// Key for the default orientation mode.
pub const KEY_DEFAULT_ORIENTATION: &str = "default.orientation_mode";
/// Key for the address format preference.
pub const KEY_ADDRESS_FORMAT: &str = "address.format";
/// Key for the altitude display toggle.
pub const KEY_SHOW_ALTITUDE: &str = "display.show_altitude";
/// Key for the speed display toggle.
pub const KEY_SHOW_SPEED: &str = "display.show_speed";
/// Key for the altitude display unit.
pub const KEY_ALTITUDE_UNIT: &str = "display.altitude_unit";
/// Key for the speed display unit.
pub const KEY_SPEED_UNIT: &str = "display.speed_unit";

/// Compiled-in fallback zoom index (10km overview).
const FALLBACK_ZOOM_INDEX: usize = 5;

/// Map rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapStyle {
    /// Vector street map.
    #[default]
    Standard,
    /// Aerial imagery.
    Satellite,
    /// Aerial imagery with street annotations.
    Hybrid,
}

impl MapStyle {
    /// String tag used for persistence.
    pub fn as_tag(&self) -> &'static str {
        match self {
            MapStyle::Standard => "standard",
            MapStyle::Satellite => "satellite",
            MapStyle::Hybrid => "hybrid",
        }
    }

    /// Parse a persisted string tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "standard" => Some(MapStyle::Standard),
            "satellite" => Some(MapStyle::Satellite),
            "hybrid" => Some(MapStyle::Hybrid),
            _ => None,
        }
    }
}

/// Flat string-keyed persistence contract.
///
/// Typed accessors have default implementations over the string plane, so
/// a backend only supplies string get/set and key presence.
pub trait SettingsStore: Send + Sync {
    /// Read a raw value.
    fn get_string(&self, key: &str) -> Option<String>;

    /// Write a raw value.
    fn set_string(&self, key: &str, value: &str);

    /// Whether the key has ever been written.
    fn contains(&self, key: &str) -> bool;

    /// Read an integer value.
    fn get_integer(&self, key: &str) -> Option<i64> {
        self.get_string(key).and_then(|s| s.parse().ok())
    }

    /// Write an integer value.
    fn set_integer(&self, key: &str, value: i64) {
        self.set_string(key, &value.to_string());
    }

    /// Read a boolean value.
    fn get_bool(&self, key: &str) -> Option<bool> {
        self.get_string(key).and_then(|s| s.parse().ok())
    }

    /// Write a boolean value.
    fn set_bool(&self, key: &str, value: bool) {
        self.set_string(key, if value { "true" } else { "false" });
    }
}

/// Typed settings facade over a [`SettingsStore`].
#[derive(Clone)]
pub struct Settings {
    store: Arc<dyn SettingsStore>,
}

impl Settings {
    /// Wrap a store.
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// First launch means none of the three "current" keys were ever
    /// written.
    pub fn is_first_launch(&self) -> bool {
        !self.store.contains(KEY_CURRENT_ZOOM_INDEX)
            && !self.store.contains(KEY_CURRENT_MAP_STYLE)
            && !self.store.contains(KEY_CURRENT_ORIENTATION)
    }

    /// On first launch, copy defaults into the current keys and persist
    /// them immediately.
    ///
    /// Returns true when seeding happened.
    pub fn seed_first_launch(&self) -> bool {
        if !self.is_first_launch() {
            return false;
        }

        info!("First launch, seeding current settings from defaults");
        self.set_current_zoom_index(self.default_zoom_index());
        self.set_current_map_style(self.default_map_style());
        self.set_current_orientation_mode(self.default_orientation_mode());
        true
    }

    /// Active zoom index, clamped to the valid range.
    pub fn current_zoom_index(&self) -> usize {
        self.store
            .get_integer(KEY_CURRENT_ZOOM_INDEX)
            .and_then(|i| usize::try_from(i).ok())
            .unwrap_or_else(|| self.default_zoom_index())
            .min(MAX_ZOOM_INDEX)
    }

    /// Persist the active zoom index.
    pub fn set_current_zoom_index(&self, index: usize) {
        self.store
            .set_integer(KEY_CURRENT_ZOOM_INDEX, index.min(MAX_ZOOM_INDEX) as i64);
    }

    /// Default zoom index applied by recentering.
    pub fn default_zoom_index(&self) -> usize {
        self.store
            .get_integer(KEY_DEFAULT_ZOOM_INDEX)
            .and_then(|i| usize::try_from(i).ok())
            .unwrap_or(FALLBACK_ZOOM_INDEX)
            .min(MAX_ZOOM_INDEX)
    }

    /// Persist the default zoom index.
    pub fn set_default_zoom_index(&self, index: usize) {
        self.store
            .set_integer(KEY_DEFAULT_ZOOM_INDEX, index.min(MAX_ZOOM_INDEX) as i64);
    }

    /// Active map style.
    pub fn current_map_style(&self) -> MapStyle {
        self.tagged(KEY_CURRENT_MAP_STYLE, MapStyle::from_tag)
            .unwrap_or_else(|| self.default_map_style())
    }

    /// Persist the active map style.
    pub fn set_current_map_style(&self, style: MapStyle) {
        self.store.set_string(KEY_CURRENT_MAP_STYLE, style.as_tag());
    }

    /// Default map style.
    pub fn default_map_style(&self) -> MapStyle {
        self.tagged(KEY_DEFAULT_MAP_STYLE, MapStyle::from_tag)
            .unwrap_or_default()
    }

    /// Persist the default map style.
    pub fn set_default_map_style(&self, style: MapStyle) {
        self.store.set_string(KEY_DEFAULT_MAP_STYLE, style.as_tag());
    }

    /// Active orientation mode.
    pub fn current_orientation_mode(&self) -> OrientationMode {
        self.tagged(KEY_CURRENT_ORIENTATION, OrientationMode::from_tag)
            .unwrap_or_else(|| self.default_orientation_mode())
    }

    /// Persist the active orientation mode.
    pub fn set_current_orientation_mode(&self, mode: OrientationMode) {
        self.store.set_string(KEY_CURRENT_ORIENTATION, mode.as_tag());
    }

    /// Default orientation mode.
    pub fn default_orientation_mode(&self) -> OrientationMode {
        self.tagged(KEY_DEFAULT_ORIENTATION, OrientationMode::from_tag)
            .unwrap_or_default()
    }

    /// Persist the default orientation mode.
    pub fn set_default_orientation_mode(&self, mode: OrientationMode) {
        self.store.set_string(KEY_DEFAULT_ORIENTATION, mode.as_tag());
    }

    /// Address format preference.
    pub fn address_format(&self) -> AddressFormatPreference {
        self.tagged(KEY_ADDRESS_FORMAT, AddressFormatPreference::from_tag)
            .unwrap_or_default()
    }

    /// Persist the address format preference.
    pub fn set_address_format(&self, preference: AddressFormatPreference) {
        self.store.set_string(KEY_ADDRESS_FORMAT, preference.as_tag());
    }

    /// Whether altitude is shown.
    pub fn show_altitude(&self) -> bool {
        self.store.get_bool(KEY_SHOW_ALTITUDE).unwrap_or(false)
    }

    /// Persist the altitude display toggle.
    pub fn set_show_altitude(&self, show: bool) {
        self.store.set_bool(KEY_SHOW_ALTITUDE, show);
    }

    /// Whether speed is shown.
    pub fn show_speed(&self) -> bool {
        self.store.get_bool(KEY_SHOW_SPEED).unwrap_or(false)
    }

    /// Persist the speed display toggle.
    pub fn set_show_speed(&self, show: bool) {
        self.store.set_bool(KEY_SHOW_SPEED, show);
    }

    /// Altitude display unit.
    pub fn altitude_unit(&self) -> AltitudeUnit {
        self.tagged(KEY_ALTITUDE_UNIT, AltitudeUnit::from_tag)
            .unwrap_or_default()
    }

    /// Persist the altitude display unit.
    pub fn set_altitude_unit(&self, unit: AltitudeUnit) {
        self.store.set_string(KEY_ALTITUDE_UNIT, unit.as_tag());
    }

    /// Speed display unit.
    pub fn speed_unit(&self) -> SpeedUnit {
        self.tagged(KEY_SPEED_UNIT, SpeedUnit::from_tag)
            .unwrap_or_default()
    }

    /// Persist the speed display unit.
    pub fn set_speed_unit(&self, unit: SpeedUnit) {
        self.store.set_string(KEY_SPEED_UNIT, unit.as_tag());
    }

    fn tagged<T>(&self, key: &str, parse: fn(&str) -> Option<T>) -> Option<T> {
        self.store.get_string(key).as_deref().and_then(parse)
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("first_launch", &self.is_first_launch())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings::new(Arc::new(MemorySettingsStore::new()))
    }

    #[test]
    fn test_first_launch_seeds_once() {
        let settings = settings();
        assert!(settings.is_first_launch());

        assert!(settings.seed_first_launch());
        assert!(!settings.is_first_launch());
        assert_eq!(settings.current_zoom_index(), FALLBACK_ZOOM_INDEX);
        assert_eq!(settings.current_map_style(), MapStyle::Standard);
        assert_eq!(
            settings.current_orientation_mode(),
            OrientationMode::NorthUp
        );

        assert!(!settings.seed_first_launch(), "seeding must not repeat");
    }

    #[test]
    fn test_any_current_key_defeats_first_launch() {
        let settings = settings();
        settings.set_current_map_style(MapStyle::Hybrid);
        assert!(!settings.is_first_launch());
    }

    #[test]
    fn test_seed_copies_persisted_defaults() {
        let settings = settings();
        settings.set_default_zoom_index(2);
        settings.set_default_orientation_mode(OrientationMode::HeadingUp);

        settings.seed_first_launch();
        assert_eq!(settings.current_zoom_index(), 2);
        assert_eq!(
            settings.current_orientation_mode(),
            OrientationMode::HeadingUp
        );
    }

    #[test]
    fn test_zoom_index_round_trip_and_clamp() {
        let settings = settings();
        settings.set_current_zoom_index(7);
        assert_eq!(settings.current_zoom_index(), 7);

        settings.set_current_zoom_index(99);
        assert_eq!(settings.current_zoom_index(), MAX_ZOOM_INDEX);
    }

    #[test]
    fn test_garbage_tag_falls_back() {
        let store = Arc::new(MemorySettingsStore::new());
        store.set_string(KEY_CURRENT_MAP_STYLE, "plasma");
        let settings = Settings::new(store);
        assert_eq!(settings.current_map_style(), MapStyle::Standard);
    }

    #[test]
    fn test_display_toggles_and_units() {
        let settings = settings();
        assert!(!settings.show_speed());

        settings.set_show_speed(true);
        settings.set_speed_unit(SpeedUnit::KilometersPerHour);
        assert!(settings.show_speed());
        assert_eq!(settings.speed_unit(), SpeedUnit::KilometersPerHour);
    }

    #[test]
    fn test_map_style_tag_round_trip() {
        for style in [MapStyle::Standard, MapStyle::Satellite, MapStyle::Hybrid] {
            assert_eq!(MapStyle::from_tag(style.as_tag()), Some(style));
        }
        assert_eq!(MapStyle::from_tag("holographic"), None);
    }
}
