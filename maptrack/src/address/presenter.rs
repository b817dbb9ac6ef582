//! Address presentation under a format preference and locale policy.

use super::locale::{ComponentOrder, LocaleProfile};
use super::{Address, AddressFormatPreference, FormattedAddress};

/// Separator for the Standard primary region pair.
const REGION_SEPARATOR: &str = " ";

/// Separator for the Detailed secondary component list.
const COMPONENT_SEPARATOR: &str = ", ";

/// Formats raw geocoder addresses into display text.
pub struct AddressPresenter;

impl AddressPresenter {
    /// Format a raw address for display.
    pub fn format(
        address: &Address,
        preference: AddressFormatPreference,
        locale: &LocaleProfile,
    ) -> FormattedAddress {
        match preference {
            AddressFormatPreference::Standard => Self::format_standard(address, locale),
            AddressFormatPreference::Detailed => Self::format_detailed(address, locale),
            AddressFormatPreference::Simple => Self::format_simple(address, locale),
        }
    }

    fn format_standard(address: &Address, locale: &LocaleProfile) -> FormattedAddress {
        let primary = if let Some(name) = non_empty(&address.name) {
            name.to_string()
        } else {
            let region = non_empty(&address.sub_administrative_area)
                .or_else(|| non_empty(&address.locality));
            let parts: Vec<&str> = non_empty(&address.administrative_area)
                .into_iter()
                .chain(region)
                .collect();
            if parts.is_empty() {
                locale.current_location_placeholder.clone()
            } else {
                parts.join(REGION_SEPARATOR)
            }
        };

        FormattedAddress {
            primary_text: primary,
            secondary_text: compose_full_address(address, locale),
            postal_code: formatted_postal_code(address, locale),
        }
    }

    fn format_detailed(address: &Address, locale: &LocaleProfile) -> FormattedAddress {
        let full = compose_full_address(address, locale);
        let primary = if full.is_empty() {
            locale.current_location_placeholder.clone()
        } else {
            full
        };

        let secondary: Vec<&str> = [
            non_empty(&address.name),
            non_empty(&address.locality),
            non_empty(&address.sub_administrative_area),
            non_empty(&address.administrative_area),
            non_empty(&address.country),
        ]
        .into_iter()
        .flatten()
        .collect();

        FormattedAddress {
            primary_text: primary,
            secondary_text: secondary.join(COMPONENT_SEPARATOR),
            postal_code: formatted_postal_code(address, locale),
        }
    }

    fn format_simple(address: &Address, locale: &LocaleProfile) -> FormattedAddress {
        let primary = non_empty(&address.locality)
            .map(str::to_string)
            .unwrap_or_else(|| locale.current_location_placeholder.clone());

        FormattedAddress {
            primary_text: primary,
            secondary_text: String::new(),
            postal_code: None,
        }
    }
}

/// Compose the full display address from components plus street detail.
///
/// The component order follows the locale family. When the geocoder's
/// `full_address` begins with the composed region prefix, the remainder is
/// kept as street-level detail; when it disagrees with the component
/// model, `full_address` wins verbatim.
fn compose_full_address(address: &Address, locale: &LocaleProfile) -> String {
    let prefix = region_prefix(address, locale);

    if prefix.is_empty() {
        return non_empty(&address.full_address)
            .map(str::to_string)
            .unwrap_or_default();
    }

    match non_empty(&address.full_address) {
        Some(full) if full.starts_with(&prefix) => {
            let detail = full[prefix.len()..].trim();
            if detail.is_empty() {
                prefix
            } else {
                match locale.order {
                    ComponentOrder::GeneralToSpecific => format!("{}{}", prefix, detail),
                    ComponentOrder::SpecificToGeneral => format!("{} {}", prefix, detail),
                }
            }
        }
        Some(full) => full.to_string(),
        None => prefix,
    }
}

/// Region components joined in locale order, without street detail.
fn region_prefix(address: &Address, locale: &LocaleProfile) -> String {
    match locale.order {
        ComponentOrder::GeneralToSpecific => [
            non_empty(&address.administrative_area),
            non_empty(&address.sub_administrative_area),
            non_empty(&address.locality),
        ]
        .into_iter()
        .flatten()
        .collect(),
        ComponentOrder::SpecificToGeneral => {
            let parts: Vec<&str> = [
                non_empty(&address.locality),
                non_empty(&address.sub_administrative_area),
                non_empty(&address.administrative_area),
                non_empty(&address.country),
            ]
            .into_iter()
            .flatten()
            .collect();
            parts.join(COMPONENT_SEPARATOR)
        }
    }
}

fn formatted_postal_code(address: &Address, locale: &LocaleProfile) -> Option<String> {
    non_empty(&address.postal_code).map(|code| locale.format_postal_code(code))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
