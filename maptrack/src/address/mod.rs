//! Address types and locale-sensitive presentation.
//!
//! Raw addresses arrive from the external geocoder with every component
//! optional. The presenter composes them into display text under the
//! user's format preference and the locale's composition rules.

mod locale;
mod presenter;

pub use locale::{ComponentOrder, LocaleProfile};
pub use presenter::AddressPresenter;

/// Raw address components from the geocoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    /// Point-of-interest or building name.
    pub name: Option<String>,
    /// The geocoder's own formatted address string.
    pub full_address: Option<String>,
    /// Postal code, unformatted.
    pub postal_code: Option<String>,
    /// City / ward / municipality.
    pub locality: Option<String>,
    /// County / district level between locality and region.
    pub sub_administrative_area: Option<String>,
    /// State / prefecture / region.
    pub administrative_area: Option<String>,
    /// Country name.
    pub country: Option<String>,
}

/// Presentation-ready address text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedAddress {
    /// Headline text (place name or region pair).
    pub primary_text: String,
    /// Supporting line (composed full address), possibly empty.
    pub secondary_text: String,
    /// Locale-formatted postal code, when known.
    pub postal_code: Option<String>,
}

/// User preference for how addresses are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressFormatPreference {
    /// Place name headline with a composed address detail line.
    #[default]
    Standard,
    /// Full address headline with a component breakdown detail line.
    Detailed,
    /// Locality only.
    Simple,
}

impl AddressFormatPreference {
    /// String tag used for persistence.
    pub fn as_tag(&self) -> &'static str {
        match self {
            AddressFormatPreference::Standard => "standard",
            AddressFormatPreference::Detailed => "detailed",
            AddressFormatPreference::Simple => "simple",
        }
    }

    /// Parse a persisted string tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "standard" => Some(AddressFormatPreference::Standard),
            "detailed" => Some(AddressFormatPreference::Detailed),
            "simple" => Some(AddressFormatPreference::Simple),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_tag_round_trip() {
        for preference in [
            AddressFormatPreference::Standard,
            AddressFormatPreference::Detailed,
            AddressFormatPreference::Simple,
        ] {
            assert_eq!(
                AddressFormatPreference::from_tag(preference.as_tag()),
                Some(preference)
            );
        }
        assert_eq!(AddressFormatPreference::from_tag("fancy"), None);
    }
}
