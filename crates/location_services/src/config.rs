//! Location services configuration

use serde::{Deserialize, Serialize};

/// Endpoints and tuning for the geocoding, routing and token services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationServicesConfig {
    /// Base URL of the geocode server (without `/findAddressCandidates`)
    #[serde(default = "default_geocode_url")]
    pub geocode_url: String,

    /// Base URL of the route service (without `/solve`)
    #[serde(default = "default_route_url")]
    pub route_url: String,

    /// OAuth2 token endpoint for application credentials
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Requested lifetime of application tokens in minutes
    #[serde(default = "default_token_expiration_minutes")]
    pub token_expiration_minutes: u32,

    /// Treat a token as expired this many seconds before it really expires
    #[serde(default = "default_refresh_margin_secs")]
    pub refresh_margin_secs: u64,

    /// Language for turn-by-turn direction text
    #[serde(default = "default_directions_language")]
    pub directions_language: String,

    /// Length unit for directions (e.g. `esriNAUMiles`, `esriNAUKilometers`)
    #[serde(default = "default_directions_length_units")]
    pub directions_length_units: String,
}

fn default_geocode_url() -> String {
    "https://geocode.arcgis.com/arcgis/rest/services/World/GeocodeServer".to_string()
}

fn default_route_url() -> String {
    "https://route.arcgis.com/arcgis/rest/services/World/Route/NAServer/Route_World".to_string()
}

fn default_token_url() -> String {
    "https://www.arcgis.com/sharing/rest/oauth2/token".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_token_expiration_minutes() -> u32 {
    120
}

const fn default_refresh_margin_secs() -> u64 {
    60
}

fn default_directions_language() -> String {
    "en".to_string()
}

fn default_directions_length_units() -> String {
    "esriNAUMiles".to_string()
}

impl Default for LocationServicesConfig {
    fn default() -> Self {
        Self {
            geocode_url: default_geocode_url(),
            route_url: default_route_url(),
            token_url: default_token_url(),
            timeout_secs: default_timeout_secs(),
            token_expiration_minutes: default_token_expiration_minutes(),
            refresh_margin_secs: default_refresh_margin_secs(),
            directions_language: default_directions_language(),
            directions_length_units: default_directions_length_units(),
        }
    }
}

impl LocationServicesConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            refresh_margin_secs: 0,
            ..Default::default()
        }
    }

    /// Point every endpoint at one base URL (used with mock servers)
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        self.geocode_url = format!("{base}/geocode");
        self.route_url = format!("{base}/route");
        self.token_url = format!("{base}/oauth2/token");
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        for (name, url) in [
            ("geocode_url", &self.geocode_url),
            ("route_url", &self.route_url),
            ("token_url", &self.token_url),
        ] {
            if url.is_empty() {
                return Err(format!("{name} must not be empty"));
            }
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.token_expiration_minutes == 0 {
            return Err("token_expiration_minutes must be greater than 0".to_string());
        }

        Ok(())
    }
}
