//! Display formatting for altitude and speed readouts.
//!
//! The engine stores meters and meters-per-second internally; these
//! helpers convert to the user's configured display unit. Whether the
//! readouts are shown at all is a settings toggle the UI layer honors.

/// Feet per meter.
const FEET_PER_METER: f64 = 3.280_84;

/// Kilometers-per-hour per meter-per-second.
const KMH_PER_MPS: f64 = 3.6;

/// Miles-per-hour per meter-per-second.
const MPH_PER_MPS: f64 = 2.236_936;

/// Knots per meter-per-second.
const KT_PER_MPS: f64 = 1.943_844;

/// Altitude display unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AltitudeUnit {
    /// Meters.
    #[default]
    Meters,
    /// Feet.
    Feet,
}

impl AltitudeUnit {
    /// String tag used for persistence.
    pub fn as_tag(&self) -> &'static str {
        match self {
            AltitudeUnit::Meters => "meters",
            AltitudeUnit::Feet => "feet",
        }
    }

    /// Parse a persisted string tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "meters" => Some(AltitudeUnit::Meters),
            "feet" => Some(AltitudeUnit::Feet),
            _ => None,
        }
    }
}

/// Speed display unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeedUnit {
    /// Meters per second.
    #[default]
    MetersPerSecond,
    /// Kilometers per hour.
    KilometersPerHour,
    /// Miles per hour.
    MilesPerHour,
    /// Knots.
    Knots,
}

impl SpeedUnit {
    /// String tag used for persistence.
    pub fn as_tag(&self) -> &'static str {
        match self {
            SpeedUnit::MetersPerSecond => "mps",
            SpeedUnit::KilometersPerHour => "kmh",
            SpeedUnit::MilesPerHour => "mph",
            SpeedUnit::Knots => "knots",
        }
    }

    /// Parse a persisted string tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "mps" => Some(SpeedUnit::MetersPerSecond),
            "kmh" => Some(SpeedUnit::KilometersPerHour),
            "mph" => Some(SpeedUnit::MilesPerHour),
            "knots" => Some(SpeedUnit::Knots),
            _ => None,
        }
    }
}

/// Format an altitude in meters for display under `unit`.
pub fn format_altitude(meters: f64, unit: AltitudeUnit) -> String {
    match unit {
        AltitudeUnit::Meters => format!("{:.0} m", meters),
        AltitudeUnit::Feet => format!("{:.0} ft", meters * FEET_PER_METER),
    }
}

/// Format a speed in meters per second for display under `unit`.
///
/// Invalid (negative) speeds render as an em-dash placeholder.
pub fn format_speed(mps: f64, unit: SpeedUnit) -> String {
    if mps < 0.0 {
        return "—".to_string();
    }
    match unit {
        SpeedUnit::MetersPerSecond => format!("{:.1} m/s", mps),
        SpeedUnit::KilometersPerHour => format!("{:.0} km/h", mps * KMH_PER_MPS),
        SpeedUnit::MilesPerHour => format!("{:.0} mph", mps * MPH_PER_MPS),
        SpeedUnit::Knots => format!("{:.0} kt", mps * KT_PER_MPS),
    }
}
