//! Platform keychain provider for secure credential storage
//!
//! Thin wrapper over the `keyring` crate: macOS Keychain, Windows Credential
//! Manager, and the Linux kernel keyring (keyutils). The backends are
//! enabled through `keyring` features; without them the crate falls back to
//! its per-entry mock store and nothing persists.
//!
//! Each namespace maps to its own keychain service
//! (`"<service_prefix>.<namespace>"`) and each key to an account entry under
//! it, so signing out of one provider never touches another provider's
//! secrets.
//!
//! ## Usage
//!
//! ```no_run
//! use calsync_common::security::{KeychainProvider, SecretStore};
//!
//! # async fn demo() -> Result<(), calsync_common::security::KeychainError> {
//! let keychain = KeychainProvider::new("CalSync");
//! keychain.set_secret("remote-calendar", "access_token", "ya29.token").await?;
//! let secret = keychain.get_secret("remote-calendar", "access_token").await?;
//! assert_eq!(secret.as_deref(), Some("ya29.token"));
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use keyring::Entry;
use tracing::debug;

use super::traits::{KeychainError, SecretStore};

/// Keychain-backed [`SecretStore`]
pub struct KeychainProvider {
    service_prefix: String,
}

impl KeychainProvider {
    /// Create a new keychain provider
    ///
    /// # Arguments
    /// * `service_prefix` - Application-level service identifier (e.g.
    ///   "CalSync")
    pub fn new(service_prefix: impl Into<String>) -> Self {
        Self { service_prefix: service_prefix.into() }
    }

    fn service_name(&self, namespace: &str) -> String {
        format!("{}.{}", self.service_prefix, namespace)
    }

    fn create_entry(&self, namespace: &str, key: &str) -> Result<Entry, KeychainError> {
        Entry::new(&self.service_name(namespace), key).map_err(|e| {
            KeychainError::AccessFailed(format!("Failed to create keychain entry: {e}"))
        })
    }
}

#[async_trait]
impl SecretStore for KeychainProvider {
    async fn set_secret(
        &self,
        namespace: &str,
        key: &str,
        value: &str,
    ) -> Result<(), KeychainError> {
        debug!(namespace, key, "Storing secret in keychain");

        let entry = self.create_entry(namespace, key)?;
        entry.set_password(value).map_err(|e| {
            KeychainError::AccessFailed(format!("Failed to store secret for {key}: {e}"))
        })
    }

    async fn get_secret(
        &self,
        namespace: &str,
        key: &str,
    ) -> Result<Option<String>, KeychainError> {
        let entry = self.create_entry(namespace, key)?;
        match entry.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(KeychainError::AccessFailed(format!(
                "Failed to retrieve secret for {key}: {e}"
            ))),
        }
    }

    async fn delete_secret(&self, namespace: &str, key: &str) -> Result<(), KeychainError> {
        debug!(namespace, key, "Deleting secret from keychain");

        let entry = self.create_entry(namespace, key)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(KeychainError::AccessFailed(format!(
                "Failed to delete secret for {key}: {e}"
            ))),
        }
    }
}
