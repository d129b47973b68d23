//! Routing client
//!
//! Solves driving routes with turn-by-turn directions across an ordered list
//! of stops. Routing requires an application token, obtained through the
//! shared [`CredentialHolder`].

use std::sync::Arc;

use async_trait::async_trait;
use domain::Coordinate;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::LocationServicesConfig;
use crate::credentials::CredentialHolder;
use crate::error::RouteError;
use crate::models::{Directions, RouteStep, RouteSummary};
use crate::transport::{Transport, TransportRequest};

/// Stops used when fewer than two are given
#[must_use]
pub const fn default_stops() -> [Coordinate; 2] {
    [Coordinate::washington_dc(), Coordinate::white_house()]
}

/// Trait for routing clients
#[async_trait]
pub trait Router: Send + Sync {
    /// Compute a route and directions visiting `stops` in order
    ///
    /// With fewer than two stops the pair from [`default_stops`] is used.
    async fn get_directions(&self, stops: &[Coordinate]) -> Result<Directions, RouteError>;
}

/// Routing client for the route service's `solve` operation
#[derive(Clone)]
pub struct RoutingClient {
    transport: Arc<dyn Transport>,
    credentials: Arc<CredentialHolder>,
    base_url: String,
    language: String,
    length_units: String,
}

impl std::fmt::Debug for RoutingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl RoutingClient {
    /// Create a new routing client
    pub fn new(
        transport: Arc<dyn Transport>,
        credentials: Arc<CredentialHolder>,
        config: &LocationServicesConfig,
    ) -> Self {
        Self {
            transport,
            credentials,
            base_url: config.route_url.trim_end_matches('/').to_string(),
            language: config.directions_language.clone(),
            length_units: config.directions_length_units.clone(),
        }
    }

    /// Format stops as `x1,y1;x2,y2;...`
    fn stops_param(stops: &[Coordinate]) -> String {
        stops
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Parse a `solve` response into the first route's directions
    fn parse_directions(value: Value, stops: usize) -> Result<Directions, RouteError> {
        let raw: RawSolveResponse =
            serde_json::from_value(value).map_err(|e| RouteError::ParseError(e.to_string()))?;

        let first = raw
            .directions
            .into_iter()
            .next()
            .ok_or(RouteError::NoRouteFound { stops })?;

        let summary = RouteSummary {
            route_name: first.route_name,
            total_length: first.summary.total_length,
            total_time: first.summary.total_time,
            total_drive_time: first.summary.total_drive_time,
        };

        let steps = first
            .features
            .into_iter()
            .map(Self::convert_step)
            .collect();

        Ok(Directions { summary, steps })
    }

    fn convert_step(raw: RawFeature) -> RouteStep {
        RouteStep {
            text: raw.attributes.text.filter(|t| !t.is_empty()),
            length: raw.attributes.length,
            time: raw.attributes.time,
            maneuver_type: raw.attributes.maneuver_type,
            geometry: raw.compressed_geometry,
        }
    }
}

#[async_trait]
impl Router for RoutingClient {
    #[instrument(skip(self, stops), fields(stops = stops.len()))]
    async fn get_directions(&self, stops: &[Coordinate]) -> Result<Directions, RouteError> {
        let defaults = default_stops();
        let stops = if stops.len() < 2 {
            debug!("Fewer than two stops given, using default stops");
            &defaults[..]
        } else {
            stops
        };

        let credential = self.credentials.get_token().await.inspect_err(|e| {
            warn!(error = %e, "Cannot route without a token");
        })?;

        let url = format!("{}/solve", self.base_url);
        let request = TransportRequest::post(url)
            .param("f", "json")
            .param("stops", Self::stops_param(stops))
            .param("returnDirections", "true")
            .param("directionsLanguage", &self.language)
            .param("directionsLengthUnits", &self.length_units)
            .header("Authorization", credential.bearer());

        debug!(count = stops.len(), "Solving route");

        let value = self.transport.send(request).await?;
        let directions = Self::parse_directions(value, stops.len())?;

        debug!(
            steps = directions.steps.len(),
            total_time = directions.summary.total_time,
            "Route solved"
        );
        Ok(directions)
    }
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
struct RawSolveResponse {
    #[serde(default)]
    directions: Vec<RawDirections>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDirections {
    route_name: Option<String>,
    summary: RawSummary,
    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSummary {
    total_length: f64,
    total_time: f64,
    total_drive_time: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFeature {
    #[serde(default)]
    attributes: RawStepAttributes,
    compressed_geometry: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStepAttributes {
    text: Option<String>,
    #[serde(default)]
    length: f64,
    #[serde(default)]
    time: f64,
    maneuver_type: Option<String>,
}
