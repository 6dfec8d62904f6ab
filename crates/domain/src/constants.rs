//! Application constants
//!
//! Centralized location for provider endpoints, credential key names, and
//! other domain-level defaults.

// Remote provider defaults
pub const DEFAULT_AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8765/callback";
pub const DEFAULT_CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";
pub const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Credential store layout
pub const REMOTE_CREDENTIAL_NAMESPACE: &str = "remote-calendar";
pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

// Event composition
pub const EVENT_LINK_PREFIX: &str = "Event Link: ";
pub const DEFAULT_EVENT_DURATION_MINUTES: i64 = 60;
pub const DEFAULT_TIME_ZONE: &str = "UTC";

// Local persistence
pub const DEFAULT_STATE_PATH: &str = "calsync-connection.json";
pub const DEFAULT_LOCAL_STORE_PATH: &str = "calsync-device-calendar.json";
