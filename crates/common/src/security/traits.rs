//! Secret storage capability
//!
//! Abstracts durable, secret-safe key/value storage so credential handling
//! can run against the OS keychain in production and an in-memory map in
//! tests.

use async_trait::async_trait;
use calsync_domain::CalSyncError;
use thiserror::Error;

/// Secret storage error types
#[derive(Debug, Error)]
pub enum KeychainError {
    /// Keychain access failed (permission denied, backend unavailable, etc.)
    #[error("Keychain access failed: {0}")]
    AccessFailed(String),
}

impl From<KeychainError> for CalSyncError {
    fn from(err: KeychainError) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Get/set/delete secrets by `(namespace, key)`.
///
/// Namespaces scope secrets per provider, e.g. `"remote-calendar"`.
/// Implementations must make deletes idempotent and report a missing secret
/// as `Ok(None)` rather than an error.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Store or overwrite a secret.
    async fn set_secret(&self, namespace: &str, key: &str, value: &str)
        -> Result<(), KeychainError>;

    /// Retrieve a secret if present.
    async fn get_secret(&self, namespace: &str, key: &str)
        -> Result<Option<String>, KeychainError>;

    /// Remove a secret. Removing an absent secret succeeds.
    async fn delete_secret(&self, namespace: &str, key: &str) -> Result<(), KeychainError>;
}
