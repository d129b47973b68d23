//! Place search
//!
//! Finds points of interest of given categories around a location. Uses the
//! same `findAddressCandidates` operation as geocoding, with an empty text
//! query and a category/location filter.

use std::sync::Arc;

use async_trait::async_trait;
use domain::Coordinate;
use tracing::instrument;

use crate::config::LocationServicesConfig;
use crate::error::GeocodeError;
use crate::geocoding::{GeocodeOptions, GeocodingClient};
use crate::models::Candidate;
use crate::transport::Transport;

/// Categories searched when none are given
pub const DEFAULT_CATEGORIES: [&str; 3] = ["Landmark", "Historical Monument", "Museum"];

/// Number of places returned when no limit is given
pub const DEFAULT_LIMIT: u32 = 10;

/// Attribute fields requested for place results
pub const PLACE_OUT_FIELDS: &str = "PlaceName,Place_addr,Phone,URL,Type";

/// Trait for place search clients
#[async_trait]
pub trait PlaceFinder: Send + Sync {
    /// Find places of the given categories near a location
    ///
    /// An empty category list, a missing location or a missing limit fall
    /// back to [`DEFAULT_CATEGORIES`], [`Coordinate::washington_dc`] and
    /// [`DEFAULT_LIMIT`].
    async fn find_places(
        &self,
        categories: &[String],
        near: Option<Coordinate>,
        limit: Option<u32>,
    ) -> Result<Vec<Candidate>, GeocodeError>;
}

/// Place search backed by the geocode server
#[derive(Debug, Clone)]
pub struct PlaceSearchClient {
    geocoder: GeocodingClient,
}

impl PlaceSearchClient {
    /// Create a new place search client
    pub fn new(transport: Arc<dyn Transport>, config: &LocationServicesConfig) -> Self {
        Self {
            geocoder: GeocodingClient::new(transport, config),
        }
    }

    /// Build the search options, applying defaults
    fn search_options(
        categories: &[String],
        near: Option<Coordinate>,
        limit: Option<u32>,
    ) -> GeocodeOptions {
        let category = if categories.is_empty() {
            DEFAULT_CATEGORIES.join(",")
        } else {
            categories.join(",")
        };

        GeocodeOptions {
            category: Some(category),
            out_fields: Some(PLACE_OUT_FIELDS.to_string()),
            max_locations: Some(limit.unwrap_or(DEFAULT_LIMIT)),
            location: Some(near.unwrap_or_else(Coordinate::washington_dc)),
        }
    }
}

#[async_trait]
impl PlaceFinder for PlaceSearchClient {
    #[instrument(skip(self))]
    async fn find_places(
        &self,
        categories: &[String],
        near: Option<Coordinate>,
        limit: Option<u32>,
    ) -> Result<Vec<Candidate>, GeocodeError> {
        let options = Self::search_options(categories, near, limit);
        self.geocoder.find_candidates("", &options).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::TransportError;
    use crate::transport::MockTransport;

    fn client(transport: MockTransport) -> PlaceSearchClient {
        PlaceSearchClient::new(Arc::new(transport), &LocationServicesConfig::for_testing())
    }

    #[test]
    fn test_defaults_applied() {
        let options = PlaceSearchClient::search_options(&[], None, None);
        assert_eq!(
            options.category.as_deref(),
            Some("Landmark,Historical Monument,Museum")
        );
        assert_eq!(options.max_locations, Some(10));
        assert_eq!(options.location, Some(Coordinate::washington_dc()));
        assert_eq!(options.out_fields.as_deref(), Some(PLACE_OUT_FIELDS));
    }

    #[test]
    fn test_explicit_arguments_win() {
        let near = Coordinate::new_unchecked(-0.1278, 51.5074);
        let options = PlaceSearchClient::search_options(
            &["Coffee Shop".to_string(), "Bakery".to_string()],
            Some(near),
            Some(3),
        );
        assert_eq!(options.category.as_deref(), Some("Coffee Shop,Bakery"));
        assert_eq!(options.max_locations, Some(3));
        assert_eq!(options.location, Some(near));
    }

    #[tokio::test]
    async fn test_find_places_sends_empty_single_line() {
        let expected_location = Coordinate::washington_dc().to_string();
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(move |req| {
                req.param_value("singleLine") == Some("")
                    && req.param_value("category") == Some("Landmark,Historical Monument,Museum")
                    && req.param_value("maxLocations") == Some("10")
                    && req.param_value("location") == Some(expected_location.as_str())
            })
            .times(1)
            .returning(|_| {
                Ok(json!({
                    "candidates": [
                        {
                            "address": "Smithsonian American Art Museum",
                            "location": { "x": -77.0229, "y": 38.8979 },
                            "score": 100,
                            "attributes": {
                                "PlaceName": "Smithsonian American Art Museum",
                                "Place_addr": "800 F St NW, Washington, District of Columbia, 20004",
                                "Phone": "(202) 633-7970",
                                "URL": "https://americanart.si.edu",
                                "Type": "Museum"
                            }
                        },
                        {
                            "address": "Ford's Theatre",
                            "location": { "x": -77.0258, "y": 38.8967 },
                            "score": 100,
                            "attributes": { "PlaceName": "Ford's Theatre", "Type": "Historical Monument" }
                        }
                    ]
                }))
            });

        let places = client(transport).find_places(&[], None, None).await.unwrap();
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].place_type.as_deref(), Some("Museum"));
        assert_eq!(places[1].place_name.as_deref(), Some("Ford's Theatre"));
    }

    #[tokio::test]
    async fn test_find_places_error() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Err(TransportError::ConnectionFailed("refused".to_string())));

        let result = client(transport).find_places(&[], None, Some(5)).await;
        assert!(matches!(result, Err(GeocodeError::Transport(_))));
    }
}
