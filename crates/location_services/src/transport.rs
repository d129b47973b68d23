//! HTTP transport shared by all service clients
//!
//! [`Transport`] is the seam between the service clients and the network.
//! [`HttpTransport`] implements it with `reqwest`: GET parameters go into the
//! query string, POST parameters into a form-encoded body. Responses are
//! decoded as JSON, and error payloads that the services return with an HTTP
//! 200 status are turned into [`TransportError::Service`].

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::LocationServicesConfig;
use crate::error::TransportError;

/// Longest response body excerpt carried in an HTTP error message
const MAX_ERROR_BODY_CHARS: usize = 200;

/// A single outbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL
    pub url: String,
    /// Query (GET) or form (POST) parameters, in order
    pub params: Vec<(String, String)>,
    /// Extra request headers
    pub headers: Vec<(String, String)>,
}

impl TransportRequest {
    /// Create a request with no parameters or headers
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Start a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// Start a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Append a parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Append a header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Look up the first parameter with the given key
    #[must_use]
    pub fn param_value(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Look up the first header with the given name (case-insensitive)
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Executes requests against the location services
///
/// Implementations never retry; each call performs at most one network
/// round trip and reports every failure as a [`TransportError`].
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and decode the JSON response
    async fn send(&self, request: TransportRequest) -> Result<Value, TransportError>;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout_secs: u64,
}

impl HttpTransport {
    /// Create a new HTTP transport
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &LocationServicesConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("location-services/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: config.timeout_secs,
        })
    }

    fn map_send_error(&self, e: &reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else if e.is_builder() {
            TransportError::InvalidRequest(e.to_string())
        } else {
            TransportError::ConnectionFailed(e.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: TransportRequest) -> Result<Value, TransportError> {
        let mut builder = self.client.request(request.method.clone(), &request.url);

        builder = if request.method == Method::GET {
            builder.query(&request.params)
        } else {
            builder.form(&request.params)
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        debug!(params = request.params.len(), "Sending request");

        let response = builder.send().await.map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        if !status.is_success() {
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown status").to_string()
            } else {
                body.chars().take(MAX_ERROR_BODY_CHARS).collect()
            };
            return Err(TransportError::Http {
                status: status.as_u16(),
                message,
            });
        }

        parse_body(&body)
    }
}

/// Decode a response body, surfacing embedded `{"error": {...}}` payloads
pub(crate) fn parse_body(body: &str) -> Result<Value, TransportError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| TransportError::ParseError(e.to_string()))?;

    if let Some(error) = value.get("error").filter(|e| e.is_object()) {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or(500);
        let mut message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();

        let details: Vec<&str> = error
            .get("details")
            .and_then(Value::as_array)
            .map(|d| d.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        if !details.is_empty() {
            message = format!("{message} ({})", details.join("; "));
        }

        debug!(code, %message, "Service returned an error payload");
        return Err(TransportError::Service { code, message });
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = TransportRequest::post("https://example.com/solve")
            .param("f", "json")
            .param("stops", "1,2;3,4")
            .header("Authorization", "Bearer abc");

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.param_value("f"), Some("json"));
        assert_eq!(request.param_value("stops"), Some("1,2;3,4"));
        assert_eq!(request.param_value("missing"), None);
        assert_eq!(request.header_value("authorization"), Some("Bearer abc"));
    }

    #[test]
    fn test_parse_body_ok() {
        let value = parse_body(r#"{"candidates": []}"#).unwrap();
        assert!(value["candidates"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_parse_body_invalid_json() {
        let err = parse_body("<html>oops</html>").unwrap_err();
        assert!(matches!(err, TransportError::ParseError(_)));
    }

    #[test]
    fn test_parse_body_error_payload() {
        let body = r#"{
            "error": {
                "code": 498,
                "message": "Invalid token.",
                "details": ["Token expired"]
            }
        }"#;
        match parse_body(body).unwrap_err() {
            TransportError::Service { code, message } => {
                assert_eq!(code, 498);
                assert_eq!(message, "Invalid token. (Token expired)");
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_body_error_without_code() {
        let err = parse_body(r#"{"error": {"message": "boom"}}"#).unwrap_err();
        assert!(matches!(err, TransportError::Service { code: 500, .. }));
    }

    #[test]
    fn test_http_transport_creation() {
        let config = LocationServicesConfig::for_testing();
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.timeout_secs, 5);
    }
}
