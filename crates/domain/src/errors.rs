//! Error types used throughout the sync engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for CalSync
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum CalSyncError {
    /// No access to the device calendar (OS permission absent or denied).
    #[error("Calendar permission denied: {0}")]
    PermissionDenied(String),

    /// Remote authorization is missing, invalid, or the OAuth flow was aborted.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Target calendar id no longer resolves.
    #[error("Calendar not found: {0}")]
    CalendarNotFound(String),

    /// Generic provider write failure.
    #[error("Event creation failed: {0}")]
    EventCreationFailed(String),

    /// Transport-level failure.
    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CalSyncError {
    /// Stable label suitable for structured logging.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::PermissionDenied(_) => "permission_denied",
            Self::AuthenticationFailed(_) => "authentication_failed",
            Self::CalendarNotFound(_) => "calendar_not_found",
            Self::EventCreationFailed(_) => "event_creation_failed",
            Self::Network(_) => "network",
            Self::Config(_) => "config",
            Self::Storage(_) => "storage",
            Self::InvalidInput(_) => "invalid_input",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for CalSync operations
pub type Result<T> = std::result::Result<T, CalSyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(CalSyncError::PermissionDenied("x".into()).label(), "permission_denied");
        assert_eq!(CalSyncError::Network("x".into()).label(), "network");
    }

    #[test]
    fn serializes_with_type_tag() {
        let json =
            serde_json::to_value(CalSyncError::AuthenticationFailed("expired".into())).unwrap();
        assert_eq!(json["type"], "AuthenticationFailed");
        assert_eq!(json["message"], "expired");
    }
}
