//! Application credential holder
//!
//! Obtains an application access token from a client id/secret pair and
//! caches it until shortly before it expires. Refreshes are single-flight:
//! callers that arrive while a token request is in flight attach to that
//! request and all receive its outcome, success or failure.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use crate::config::LocationServicesConfig;
use crate::error::AuthError;
use crate::transport::{Transport, TransportRequest};

/// A time-bounded access token
#[derive(Debug, Clone)]
pub struct Credential {
    access_token: SecretString,
    expires_at: DateTime<Utc>,
}

impl Credential {
    /// Create a credential
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            expires_at,
        }
    }

    /// When the token stops being accepted
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the token is expired at `now`, or will be within `margin`
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>, margin: TimeDelta) -> bool {
        now.checked_add_signed(margin)
            .is_none_or(|deadline| deadline >= self.expires_at)
    }

    /// `Authorization` header value carrying this token
    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token.expose_secret())
    }
}

/// Lifecycle of the cached credential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// No token has been obtained, or the last attempt failed
    Unauthenticated,
    /// A token request is in flight
    Authenticating,
    /// A valid token is cached
    Authenticated,
    /// The cached token has expired and will be refreshed on next use
    Expired,
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "unauthenticated"),
            Self::Authenticating => write!(f, "authenticating"),
            Self::Authenticated => write!(f, "authenticated"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

type PendingToken = Arc<OnceCell<Result<Credential, AuthError>>>;

#[derive(Default)]
struct TokenState {
    credential: Option<Credential>,
    pending: Option<PendingToken>,
}

/// Holds application credentials and the cached access token
pub struct CredentialHolder {
    transport: Arc<dyn Transport>,
    token_url: String,
    client_id: String,
    client_secret: SecretString,
    expiration_minutes: u32,
    refresh_margin: TimeDelta,
    state: Mutex<TokenState>,
}

impl fmt::Debug for CredentialHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHolder")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl CredentialHolder {
    /// Create a credential holder
    ///
    /// # Errors
    ///
    /// Returns an error if the client id or secret is empty.
    pub fn new(
        transport: Arc<dyn Transport>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        config: &LocationServicesConfig,
    ) -> Result<Self, AuthError> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();

        if client_id.trim().is_empty() {
            return Err(AuthError::new("client_id is required"));
        }
        if client_secret.trim().is_empty() {
            return Err(AuthError::new("client_secret is required"));
        }

        let refresh_margin = seconds(config.refresh_margin_secs);

        Ok(Self {
            transport,
            token_url: config.token_url.clone(),
            client_id,
            client_secret: SecretString::from(client_secret),
            expiration_minutes: config.token_expiration_minutes,
            refresh_margin,
            state: Mutex::new(TokenState::default()),
        })
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> AuthState {
        let state = self.state.lock();
        if state.pending.is_some() {
            return AuthState::Authenticating;
        }
        match &state.credential {
            None => AuthState::Unauthenticated,
            Some(c) if c.is_expired_at(Utc::now(), self.refresh_margin) => AuthState::Expired,
            Some(_) => AuthState::Authenticated,
        }
    }

    /// Drop the cached token so the next call fetches a new one
    pub fn invalidate(&self) {
        self.state.lock().credential = None;
    }

    /// Return a valid credential, fetching a new token if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the token request fails or its response has no
    /// access token.
    pub async fn get_token(&self) -> Result<Credential, AuthError> {
        let pending = {
            let mut state = self.state.lock();
            if let Some(credential) = state
                .credential
                .as_ref()
                .filter(|c| !c.is_expired_at(Utc::now(), self.refresh_margin))
            {
                return Ok(credential.clone());
            }
            Arc::clone(
                state
                    .pending
                    .get_or_insert_with(|| Arc::new(OnceCell::new())),
            )
        };

        let result = pending.get_or_init(|| self.fetch_token()).await.clone();

        let mut state = self.state.lock();
        if state
            .pending
            .as_ref()
            .is_some_and(|p| Arc::ptr_eq(p, &pending))
        {
            state.pending = None;
            state.credential = result.as_ref().ok().cloned();
        }

        result
    }

    #[instrument(skip(self), fields(client_id = %self.client_id))]
    async fn fetch_token(&self) -> Result<Credential, AuthError> {
        let request = TransportRequest::post(&self.token_url)
            .param("client_id", &self.client_id)
            .param("client_secret", self.client_secret.expose_secret())
            .param("grant_type", "client_credentials")
            .param("expiration", self.expiration_minutes.to_string())
            .param("f", "json");

        debug!("Requesting application token");

        let value = self.transport.send(request).await.map_err(|e| {
            warn!(error = %e, "Token request failed");
            AuthError::from_transport(e)
        })?;

        let response: TokenResponse = serde_json::from_value(value)
            .map_err(|e| AuthError::new(format!("Invalid token response: {e}")))?;

        let access_token = response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::new("Token response did not contain an access token"))?;

        let lifetime_secs = response
            .expires_in
            .unwrap_or_else(|| u64::from(self.expiration_minutes) * 60);
        let expires_at = Utc::now()
            .checked_add_signed(seconds(lifetime_secs))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        info!(%expires_at, "Obtained application token");
        Ok(Credential::new(access_token, expires_at))
    }
}

/// Duration from a second count, saturating at `u32::MAX` seconds
fn seconds(secs: u64) -> TimeDelta {
    TimeDelta::seconds(i64::from(u32::try_from(secs).unwrap_or(u32::MAX)))
}

/// Raw token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
}
