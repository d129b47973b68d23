//! Location services data models
//!
//! Typed representations of geocoding candidates and routing directions as
//! returned by the geocode and route services.

use std::fmt;

use domain::Coordinate;
use serde::{Deserialize, Serialize};

/// One ranked result from a geocode or place search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    /// Name of the place (`PlaceName` attribute)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_name: Option<String>,
    /// Street address (`Place_addr`, falling back to the matched address)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Phone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Web site
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Place category (`Type` attribute, e.g. "Museum")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_type: Option<String>,
    /// Match score (0-100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Location of the candidate
    pub location: Coordinate,
}

impl Candidate {
    /// Create a candidate with only a location
    #[must_use]
    pub const fn at(location: Coordinate) -> Self {
        Self {
            place_name: None,
            address: None,
            phone: None,
            url: None,
            place_type: None,
            score: None,
            location,
        }
    }

    /// Set the place name
    #[must_use]
    pub fn with_place_name(mut self, name: impl Into<String>) -> Self {
        self.place_name = Some(name.into());
        self
    }

    /// Set the address
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Multi-line description: name and type, address, phone and URL
    #[must_use]
    pub fn format_detail(&self) -> String {
        let name = self.place_name.as_deref().unwrap_or("Unnamed place");
        let kind = self.place_type.as_deref().unwrap_or("unknown");
        let address = self.address.as_deref().unwrap_or_default();
        let phone = self.phone.as_deref().unwrap_or_default();
        let url = self.url.as_deref().unwrap_or_default();

        format!("{name} ({kind})\n{address}\n{phone} {url}")
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.place_name, &self.address) {
            (Some(name), Some(address)) => write!(f, "{name}, {address}"),
            (Some(name), None) => write!(f, "{name}"),
            (None, Some(address)) => write!(f, "{address}"),
            (None, None) => write!(f, "{}", self.location),
        }
    }
}

/// Aggregate figures for a solved route
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteSummary {
    /// Route name assigned by the service (e.g. "Location 1 - Location 2")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_name: Option<String>,
    /// Total length in the configured length unit
    pub total_length: f64,
    /// Total time in minutes
    pub total_time: f64,
    /// Driving time in minutes, excluding stop service time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_drive_time: Option<f64>,
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.route_name {
            write!(f, "{name}: ")?;
        }
        write!(f, "{:.2} ({:.1} min)", self.total_length, self.total_time)
    }
}

/// One directive of turn-by-turn directions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteStep {
    /// Instruction text (e.g. "Turn left on 15th St NW")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Length of this step in the configured length unit
    pub length: f64,
    /// Time for this step in minutes
    pub time: f64,
    /// Maneuver classification (e.g. `esriDMTTurnLeft`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maneuver_type: Option<String>,
    /// Compressed geometry string of the step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<String>,
}

/// Result of a successful route solve
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Directions {
    /// Route totals
    pub summary: RouteSummary,
    /// Ordered turn-by-turn steps
    pub steps: Vec<RouteStep>,
}

impl Directions {
    /// Instruction texts in order, skipping steps without text
    pub fn instructions(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|s| s.text.as_deref())
    }
}
