//! Conversions from external infrastructure errors into domain errors.

use calsync_domain::CalSyncError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CalSyncError);

impl From<InfraError> for CalSyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CalSyncError> for InfraError {
    fn from(value: CalSyncError) -> Self {
        Self(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoCalSyncError {
    fn into_calsync(self) -> CalSyncError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → CalSyncError */
/* -------------------------------------------------------------------------- */

impl IntoCalSyncError for HttpError {
    fn into_calsync(self) -> CalSyncError {
        if self.is_timeout() {
            return CalSyncError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return CalSyncError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return CalSyncError::Network(format!("Invalid response body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 => CalSyncError::AuthenticationFailed(message),
                403 => CalSyncError::PermissionDenied(message),
                404 => CalSyncError::CalendarNotFound(message),
                400..=499 => CalSyncError::InvalidInput(message),
                _ => CalSyncError::Network(message),
            };
        }

        CalSyncError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_calsync())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error / serde_json::Error → CalSyncError */
/* -------------------------------------------------------------------------- */

impl IntoCalSyncError for std::io::Error {
    fn into_calsync(self) -> CalSyncError {
        CalSyncError::Storage(format!("I/O error ({:?}): {self}", self.kind()))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        Self(value.into_calsync())
    }
}

impl IntoCalSyncError for serde_json::Error {
    fn into_calsync(self) -> CalSyncError {
        CalSyncError::Storage(format!("Malformed JSON at line {}: {self}", self.line()))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        Self(value.into_calsync())
    }
}

/* -------------------------------------------------------------------------- */
/* url::ParseError → CalSyncError */
/* -------------------------------------------------------------------------- */

impl IntoCalSyncError for url::ParseError {
    fn into_calsync(self) -> CalSyncError {
        CalSyncError::Config(format!("Invalid URL: {self}"))
    }
}

impl From<url::ParseError> for InfraError {
    fn from(value: url::ParseError) -> Self {
        Self(value.into_calsync())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
