//! Configuration management

use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_AUTHORIZATION_ENDPOINT, DEFAULT_AUTH_TIMEOUT_SECS,
    DEFAULT_CALENDAR_SCOPE, DEFAULT_LOCAL_STORE_PATH, DEFAULT_REDIRECT_URI,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_STATE_PATH, DEFAULT_TIME_ZONE, DEFAULT_TOKEN_ENDPOINT,
    REMOTE_CREDENTIAL_NAMESPACE,
};
use crate::{CalSyncError, Result};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub remote: RemoteCalendarConfig,
    pub local: LocalCalendarConfig,
    pub sync: SyncConfig,
}

/// Remote REST calendar + OAuth2 configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteCalendarConfig {
    pub client_id: String,
    pub redirect_uri: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub api_base_url: String,
    pub scopes: Vec<String>,
    pub credential_namespace: String,
    pub auth_timeout_seconds: u64,
    pub request_timeout_seconds: u64,
}

/// Device calendar configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalCalendarConfig {
    pub store_path: String,
}

/// Sync engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub state_path: String,
    /// IANA zone used to anchor timed events.
    pub time_zone: String,
}

impl RemoteCalendarConfig {
    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }
}

impl SyncConfig {
    /// Parse the configured IANA time zone.
    ///
    /// # Errors
    /// Returns `CalSyncError::Config` for unknown zone names.
    pub fn tz(&self) -> Result<Tz> {
        self.time_zone.parse::<Tz>().map_err(|e| {
            CalSyncError::Config(format!("Invalid time zone '{}': {e}", self.time_zone))
        })
    }
}

impl Default for RemoteCalendarConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            authorization_endpoint: DEFAULT_AUTHORIZATION_ENDPOINT.to_string(),
            token_endpoint: DEFAULT_TOKEN_ENDPOINT.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            scopes: vec![DEFAULT_CALENDAR_SCOPE.to_string()],
            credential_namespace: REMOTE_CREDENTIAL_NAMESPACE.to_string(),
            auth_timeout_seconds: DEFAULT_AUTH_TIMEOUT_SECS,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Default for LocalCalendarConfig {
    fn default() -> Self {
        Self { store_path: DEFAULT_LOCAL_STORE_PATH.to_string() }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            state_path: DEFAULT_STATE_PATH.to_string(),
            time_zone: DEFAULT_TIME_ZONE.to_string(),
        }
    }
}
