//! Geocoding client
//!
//! Converts free-form address and place strings into candidate locations via
//! the geocode server's `findAddressCandidates` operation. Geocoding does not
//! require authentication.

use std::sync::Arc;

use async_trait::async_trait;
use domain::Coordinate;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::LocationServicesConfig;
use crate::error::GeocodeError;
use crate::models::Candidate;
use crate::transport::{Transport, TransportRequest};

/// Optional search parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeocodeOptions {
    /// Category filter, comma-separated (e.g. "POI" or "Museum,Landmark")
    pub category: Option<String>,
    /// Attribute fields to return (e.g. "PlaceName,Place_addr,Phone,URL")
    pub out_fields: Option<String>,
    /// Maximum number of candidates
    pub max_locations: Option<u32>,
    /// Location used to rank nearby candidates higher
    pub location: Option<Coordinate>,
}

impl GeocodeOptions {
    /// Options for a point-of-interest lookup with the usual display fields
    #[must_use]
    pub fn poi() -> Self {
        Self {
            category: Some("POI".to_string()),
            out_fields: Some("PlaceName,Place_addr,Phone,URL".to_string()),
            ..Self::default()
        }
    }
}

/// Trait for geocoding clients
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Find candidate locations for a free-text query
    ///
    /// An empty or blank query yields no candidates without contacting the
    /// service. An empty candidate list is a successful result.
    async fn geocode(
        &self,
        query: &str,
        options: &GeocodeOptions,
    ) -> Result<Vec<Candidate>, GeocodeError>;
}

/// Geocoding client for the `findAddressCandidates` operation
#[derive(Clone)]
pub struct GeocodingClient {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl std::fmt::Debug for GeocodingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeocodingClient {
    /// Create a new geocoding client
    pub fn new(transport: Arc<dyn Transport>, config: &LocationServicesConfig) -> Self {
        Self {
            transport,
            base_url: config.geocode_url.trim_end_matches('/').to_string(),
        }
    }

    /// Issue one `findAddressCandidates` request
    ///
    /// Unlike [`Geocoder::geocode`], an empty `single_line` is sent as is;
    /// category and location searches rely on that.
    pub(crate) async fn find_candidates(
        &self,
        single_line: &str,
        options: &GeocodeOptions,
    ) -> Result<Vec<Candidate>, GeocodeError> {
        let url = format!("{}/findAddressCandidates", self.base_url);

        let mut request = TransportRequest::get(url)
            .param("f", "json")
            .param("singleLine", single_line);

        if let Some(category) = &options.category {
            request = request.param("category", category);
        }
        if let Some(out_fields) = &options.out_fields {
            request = request.param("outFields", out_fields);
        }
        if let Some(max) = options.max_locations {
            request = request.param("maxLocations", max.to_string());
        }
        if let Some(location) = options.location {
            request = request.param("location", location.to_string());
        }

        let value = self.transport.send(request).await?;
        let candidates = Self::parse_candidates(value)?;

        if candidates.is_empty() {
            warn!("No candidates found");
        }
        debug!(count = candidates.len(), "Candidates found");

        Ok(candidates)
    }

    /// Parse a `findAddressCandidates` response into candidates
    fn parse_candidates(value: Value) -> Result<Vec<Candidate>, GeocodeError> {
        let raw: RawFindResponse =
            serde_json::from_value(value).map_err(|e| GeocodeError::ParseError(e.to_string()))?;

        Ok(raw
            .candidates
            .into_iter()
            .map(Self::convert_candidate)
            .collect())
    }

    /// Convert a raw candidate, treating blank attributes as missing
    fn convert_candidate(raw: RawCandidate) -> Candidate {
        let attrs = raw.attributes;
        Candidate {
            place_name: non_empty(attrs.place_name),
            address: non_empty(attrs.place_addr).or_else(|| non_empty(raw.address)),
            phone: non_empty(attrs.phone),
            url: non_empty(attrs.url),
            place_type: non_empty(attrs.place_type),
            score: raw.score,
            location: Coordinate::new_unchecked(raw.location.x, raw.location.y),
        }
    }
}

#[async_trait]
impl Geocoder for GeocodingClient {
    #[instrument(skip(self, options))]
    async fn geocode(
        &self,
        query: &str,
        options: &GeocodeOptions,
    ) -> Result<Vec<Candidate>, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Nothing to search for");
            return Ok(Vec::new());
        }

        self.find_candidates(query, options).await
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
struct RawFindResponse {
    candidates: Vec<RawCandidate>,
}

#[derive(Debug, Deserialize)]
struct RawCandidate {
    address: Option<String>,
    location: RawPoint,
    score: Option<f64>,
    #[serde(default)]
    attributes: RawAttributes,
}

#[derive(Debug, Deserialize)]
struct RawPoint {
    x: f64,
    y: f64,
}

#[derive(Debug, Default, Deserialize)]
struct RawAttributes {
    #[serde(rename = "PlaceName")]
    place_name: Option<String>,
    #[serde(rename = "Place_addr")]
    place_addr: Option<String>,
    #[serde(rename = "Phone")]
    phone: Option<String>,
    #[serde(rename = "URL")]
    url: Option<String>,
    #[serde(rename = "Type")]
    place_type: Option<String>,
}
