//! Location services client
//!
//! Geocoding, place search and routing against the ArcGIS World Geocoding
//! and World Route services, with client-credential token handling.
//!
//! # Architecture
//!
//! Every client sends its requests through a shared [`Transport`]
//! ([`HttpTransport`] in production). [`GeocodingClient`] and
//! [`PlaceSearchClient`] need no authentication. [`RoutingClient`] obtains an
//! access token from a shared [`CredentialHolder`] before each solve; the
//! holder caches the token and collapses concurrent refreshes into a single
//! token request.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use location_services::{
//!     CredentialHolder, HttpTransport, LocationServicesConfig, Router, RoutingClient, Transport,
//! };
//!
//! let config = LocationServicesConfig::default();
//! let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config)?);
//! let credentials = Arc::new(CredentialHolder::new(
//!     Arc::clone(&transport),
//!     client_id,
//!     client_secret,
//!     &config,
//! )?);
//! let router = RoutingClient::new(transport, credentials, &config);
//!
//! let directions = router.get_directions(&[]).await?; // default stops
//! ```

mod config;
mod credentials;
mod error;
mod geocoding;
mod models;
mod places;
mod routing;
mod transport;

pub use config::LocationServicesConfig;
pub use credentials::{AuthState, Credential, CredentialHolder};
pub use error::{AuthError, GeocodeError, RouteError, TransportError};
pub use geocoding::{GeocodeOptions, Geocoder, GeocodingClient};
pub use models::{Candidate, Directions, RouteStep, RouteSummary};
pub use places::{DEFAULT_CATEGORIES, DEFAULT_LIMIT, PLACE_OUT_FIELDS, PlaceFinder, PlaceSearchClient};
pub use routing::{Router, RoutingClient, default_stops};
pub use transport::{HttpTransport, Transport, TransportRequest};
