//! In-memory doubles for the shared traits
//!
//! Used by this crate's unit tests and, through the `test-utils` feature, by
//! the core and infra test suites.

// Test doubles: errors are clearly indicated by their return types
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::security::{KeychainError, SecretStore};

type SecretMap = Arc<Mutex<HashMap<(String, String), String>>>;

/// [`SecretStore`] backed by a `HashMap` keyed by `(namespace, key)`
///
/// Clones share the same storage, so a test can hand one clone to the code
/// under test and inspect the other.
///
/// # Examples
///
/// ```
/// use calsync_common::testing::MemorySecretStore;
///
/// let store = MemorySecretStore::new();
/// store.insert("remote-calendar", "access_token", "token");
/// assert_eq!(store.get("remote-calendar", "access_token").as_deref(), Some("token"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySecretStore {
    storage: SecretMap,
    fail_reads: Arc<Mutex<bool>>,
}

impl MemorySecretStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a secret without going through the async trait
    pub fn insert(&self, namespace: &str, key: &str, value: &str) {
        // SAFETY: Mutex poisoning is acceptable in test mocks
        self.storage
            .lock()
            .unwrap()
            .insert((namespace.to_string(), key.to_string()), value.to_string());
    }

    /// Read a secret synchronously
    pub fn get(&self, namespace: &str, key: &str) -> Option<String> {
        self.storage.lock().unwrap().get(&(namespace.to_string(), key.to_string())).cloned()
    }

    /// Whether any secret exists under `namespace`
    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.storage.lock().unwrap().keys().any(|(ns, _)| ns == namespace)
    }

    /// Make every subsequent `get_secret` fail with `AccessFailed`
    pub fn fail_reads(&self, fail: bool) {
        *self.fail_reads.lock().unwrap() = fail;
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn set_secret(
        &self,
        namespace: &str,
        key: &str,
        value: &str,
    ) -> Result<(), KeychainError> {
        self.insert(namespace, key, value);
        Ok(())
    }

    async fn get_secret(
        &self,
        namespace: &str,
        key: &str,
    ) -> Result<Option<String>, KeychainError> {
        if *self.fail_reads.lock().unwrap() {
            return Err(KeychainError::AccessFailed("keychain locked".to_string()));
        }
        Ok(self.get(namespace, key))
    }

    async fn delete_secret(&self, namespace: &str, key: &str) -> Result<(), KeychainError> {
        self.storage.lock().unwrap().remove(&(namespace.to_string(), key.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clones_share_storage() {
        let store = MemorySecretStore::new();
        let clone = store.clone();

        clone.set_secret("ns", "k", "v").await.unwrap();

        assert_eq!(store.get("ns", "k").as_deref(), Some("v"));
        assert!(store.has_namespace("ns"));
    }

    #[tokio::test]
    async fn fail_reads_surfaces_access_error() {
        let store = MemorySecretStore::new();
        store.fail_reads(true);

        let err = store.get_secret("ns", "k").await.unwrap_err();
        assert!(matches!(err, KeychainError::AccessFailed(_)));
    }
}
