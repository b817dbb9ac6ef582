//! Reverse geocoding service contract and request pipeline.
//!
//! The geocoding backend is rate-limited, so lookups are debounced and
//! cancellable: a burst of coordinate changes produces at most one network
//! call, and a newer request immediately invalidates the in-flight one.
//! Each subject (user position, map-center probe) owns an independent
//! pipeline instance.

mod pipeline;

pub use pipeline::{
    GeocodingPipeline, PipelineConfig, GEOCODE_TIMEOUT, MAP_CENTER_DEBOUNCE,
    MIN_DISPLACEMENT_M, USER_POSITION_DEBOUNCE,
};

use futures::future::BoxFuture;
use thiserror::Error;

use crate::address::Address;
use crate::coord::Coordinate;

/// Logical owner of a geocoding pipeline instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeocodeSubject {
    /// The user's live position.
    UserPosition,
    /// Wherever the map is currently centered.
    MapCenter,
}

impl std::fmt::Display for GeocodeSubject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeocodeSubject::UserPosition => write!(f, "user-position"),
            GeocodeSubject::MapCenter => write!(f, "map-center"),
        }
    }
}

/// Failure kinds from the geocoding backend.
#[derive(Debug, Clone, Error)]
pub enum GeocodeError {
    /// The service resolved nothing for the coordinate.
    #[error("no address found for coordinate")]
    NoResults,

    /// The service failed or timed out.
    #[error("geocoding service failure: {0}")]
    ServiceFailure(String),

    /// The coordinate cannot be geocoded.
    #[error("coordinate is not geocodable")]
    InvalidInput,
}

/// Contract for the external reverse-geocoding backend.
pub trait GeocodeService: Send + Sync + 'static {
    /// Resolve a coordinate to a raw address.
    fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> BoxFuture<'static, Result<Address, GeocodeError>>;
}

/// Completed lookup, marshalled back to the single-writer context.
///
/// Carries the generation token of the request that produced it; the
/// pipeline discards outcomes whose token is no longer current.
#[derive(Debug)]
pub struct GeocodeOutcome {
    /// Which pipeline instance this outcome belongs to.
    pub subject: GeocodeSubject,
    /// Generation token of the originating request.
    pub token: u64,
    /// The coordinate that was resolved.
    pub coordinate: Coordinate,
    /// The raw lookup result.
    pub result: Result<Address, GeocodeError>,
}

#[cfg(test)]
pub mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::*;

    /// Mock geocoder with a scripted response and a call counter.
    pub struct MockGeocoder {
        calls: AtomicUsize,
        response: Mutex<Result<Address, GeocodeError>>,
        last_coordinate: Mutex<Option<Coordinate>>,
    }

    impl MockGeocoder {
        pub fn returning(response: Result<Address, GeocodeError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response: Mutex::new(response),
                last_coordinate: Mutex::new(None),
            }
        }

        pub fn with_address(address: Address) -> Self {
            Self::returning(Ok(address))
        }

        pub fn set_response(&self, response: Result<Address, GeocodeError>) {
            *self.response.lock() = response;
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_coordinate(&self) -> Option<Coordinate> {
            *self.last_coordinate.lock()
        }
    }

    impl GeocodeService for MockGeocoder {
        fn reverse_geocode(
            &self,
            coordinate: Coordinate,
        ) -> BoxFuture<'static, Result<Address, GeocodeError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_coordinate.lock() = Some(coordinate);
            let response = self.response.lock().clone();
            Box::pin(async move { response })
        }
    }

    #[test]
    fn test_mock_geocoder_counts_calls() {
        let mock = MockGeocoder::with_address(Address::default());
        assert_eq!(mock.call_count(), 0);
        let _ = mock.reverse_geocode(Coordinate::new(0.0, 0.0));
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_error_display() {
        assert!(GeocodeError::NoResults.to_string().contains("no address"));
        assert!(GeocodeError::ServiceFailure("boom".to_string())
            .to_string()
            .contains("boom"));
    }
}
