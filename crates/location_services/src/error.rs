//! Location services error types

use thiserror::Error;

/// Errors raised by the HTTP transport
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Connection to the service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// Non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Status text or response body excerpt
        message: String,
    },

    /// The service answered with an error payload
    #[error("Service error {code}: {message}")]
    Service {
        /// Error code reported by the service
        code: i64,
        /// Error message reported by the service
        message: String,
    },

    /// Failed to decode the response body
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// Returns true if a caller may reasonably retry the request
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionFailed(_) | Self::Timeout { .. } => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            Self::Service { code, .. } => *code == 429 || *code >= 500,
            Self::ParseError(_) | Self::InvalidRequest(_) => false,
        }
    }

    /// Status code carried by the error, if any
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Service { code, .. } => u16::try_from(*code).ok(),
            _ => None,
        }
    }
}

/// Failure to obtain an application access token
#[derive(Debug, Clone, Error)]
#[error("Authentication failed: {reason}")]
pub struct AuthError {
    /// Human-readable reason
    pub reason: String,
    /// Underlying transport failure, if the token request was sent
    #[source]
    pub cause: Option<TransportError>,
}

impl AuthError {
    /// Create an error caused by a failed token request
    #[must_use]
    pub fn from_transport(cause: TransportError) -> Self {
        Self {
            reason: cause.to_string(),
            cause: Some(cause),
        }
    }

    /// Create an error that did not come from the transport
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            cause: None,
        }
    }
}

/// Errors from geocoding and place search
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The search request failed
    #[error("Geocoding request failed: {0}")]
    Transport(#[from] TransportError),

    /// The response did not have the expected shape
    #[error("Geocoding parse error: {0}")]
    ParseError(String),
}

/// Errors from route solving
#[derive(Debug, Error)]
pub enum RouteError {
    /// No valid credential could be obtained
    #[error("Routing not authorized: {0}")]
    Auth(#[from] AuthError),

    /// The routing request failed
    #[error("Routing request failed: {0}")]
    Transport(#[from] TransportError),

    /// The service returned no route for the stops
    #[error("No route found for {stops} stops")]
    NoRouteFound {
        /// Number of stops in the request
        stops: usize,
    },

    /// The response did not have the expected shape
    #[error("Routing parse error: {0}")]
    ParseError(String),
}
