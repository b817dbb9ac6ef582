//! Locale policy for address composition.
//!
//! Address formatting differs by locale family in two ways the presenter
//! cares about: the component order of the composed address, and whether
//! the language writes postal codes with a marker glyph. Anything beyond
//! that (full localization tables) lives outside the engine; the
//! placeholder text ships with a per-language default and is overridable.

/// Component order family for composed addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentOrder {
    /// Largest region first, concatenated without separators
    /// (Japanese-style: 東京都千代田区).
    GeneralToSpecific,
    /// Most specific first, comma-separated
    /// (Western-style: Chiyoda, Tokyo, Japan).
    SpecificToGeneral,
}

/// Postal marker used by Japanese addresses.
const POSTAL_MARK_JP: &str = "〒";

/// Locale-dependent address composition rules.
#[derive(Debug, Clone)]
pub struct LocaleProfile {
    /// Primary language subtag this profile was derived from.
    pub language: String,
    /// Component order family.
    pub order: ComponentOrder,
    /// Marker glyph prefixed to postal codes, for languages that use one.
    pub postal_marker: Option<&'static str>,
    /// Localized "current location" placeholder.
    pub current_location_placeholder: String,
}

impl LocaleProfile {
    /// Derive a profile from a language tag such as `en`, `ja`, or `ja-JP`.
    ///
    /// Only the primary subtag matters; unknown languages get the
    /// Western-order profile with an English placeholder.
    pub fn for_tag(tag: &str) -> Self {
        let language = tag
            .split(['-', '_'])
            .next()
            .unwrap_or(tag)
            .to_ascii_lowercase();

        match language.as_str() {
            "ja" => Self {
                language,
                order: ComponentOrder::GeneralToSpecific,
                postal_marker: Some(POSTAL_MARK_JP),
                current_location_placeholder: "現在地".to_string(),
            },
            "zh" | "ko" => Self {
                language,
                order: ComponentOrder::GeneralToSpecific,
                postal_marker: None,
                current_location_placeholder: "Current Location".to_string(),
            },
            _ => Self {
                language,
                order: ComponentOrder::SpecificToGeneral,
                postal_marker: None,
                current_location_placeholder: "Current Location".to_string(),
            },
        }
    }

    /// Override the placeholder text (localization tables are external).
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.current_location_placeholder = placeholder.into();
        self
    }

    /// Format a postal code under this locale's marker rule.
    ///
    /// The marker is prefixed only when the language uses one and the code
    /// does not already carry it; otherwise the code passes through
    /// unchanged.
    pub fn format_postal_code(&self, code: &str) -> String {
        match self.postal_marker {
            Some(marker) if !code.starts_with(marker) => format!("{}{}", marker, code),
            _ => code.to_string(),
        }
    }
}

impl Default for LocaleProfile {
    fn default() -> Self {
        Self::for_tag("en")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_japanese_profile() {
        let locale = LocaleProfile::for_tag("ja-JP");
        assert_eq!(locale.language, "ja");
        assert_eq!(locale.order, ComponentOrder::GeneralToSpecific);
        assert_eq!(locale.postal_marker, Some("〒"));
        assert_eq!(locale.current_location_placeholder, "現在地");
    }

    #[test]
    fn test_english_profile() {
        let locale = LocaleProfile::for_tag("en-US");
        assert_eq!(locale.order, ComponentOrder::SpecificToGeneral);
        assert_eq!(locale.postal_marker, None);
    }

    #[test]
    fn test_unknown_language_falls_back_western() {
        let locale = LocaleProfile::for_tag("tlh");
        assert_eq!(locale.order, ComponentOrder::SpecificToGeneral);
    }

    #[test]
    fn test_underscore_tag_variant() {
        let locale = LocaleProfile::for_tag("ja_JP");
        assert_eq!(locale.language, "ja");
    }

    #[test]
    fn test_postal_marker_prefixed_once() {
        let locale = LocaleProfile::for_tag("ja");
        assert_eq!(locale.format_postal_code("100-0005"), "〒100-0005");
        assert_eq!(locale.format_postal_code("〒100-0005"), "〒100-0005");
    }

    #[test]
    fn test_postal_code_untouched_without_marker() {
        let locale = LocaleProfile::for_tag("en");
        assert_eq!(locale.format_postal_code("SW1A 1AA"), "SW1A 1AA");
    }

    #[test]
    fn test_placeholder_override() {
        let locale = LocaleProfile::for_tag("fr").with_placeholder("Position actuelle");
        assert_eq!(locale.current_location_placeholder, "Position actuelle");
    }
}
