//! OAuth token storage helpers layered on top of [`SecretStore`].
//!
//! Tokens live under a provider namespace with the fixed keys
//! `access_token` and `refresh_token`. Nothing here caches a token in memory:
//! every reader goes back to the store, so a delete is observed by the very
//! next call.

use calsync_domain::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use tracing::debug;

use super::types::OAuthCredential;
use crate::security::{KeychainError, SecretStore};

/// Persist OAuth tokens. The refresh token is written only when present.
pub async fn store_credential(
    store: &dyn SecretStore,
    namespace: &str,
    credential: &OAuthCredential,
) -> Result<(), KeychainError> {
    debug!(namespace, has_refresh = credential.refresh_token.is_some(), "Storing OAuth tokens");

    store.set_secret(namespace, ACCESS_TOKEN_KEY, &credential.access_token).await?;
    if let Some(refresh) = &credential.refresh_token {
        store.set_secret(namespace, REFRESH_TOKEN_KEY, refresh).await?;
    }
    Ok(())
}

/// Read the access token, if any.
pub async fn load_access_token(
    store: &dyn SecretStore,
    namespace: &str,
) -> Result<Option<String>, KeychainError> {
    store.get_secret(namespace, ACCESS_TOKEN_KEY).await
}

/// Read both tokens. Returns `None` when no access token is stored.
pub async fn load_credential(
    store: &dyn SecretStore,
    namespace: &str,
) -> Result<Option<OAuthCredential>, KeychainError> {
    let Some(access_token) = store.get_secret(namespace, ACCESS_TOKEN_KEY).await? else {
        return Ok(None);
    };
    let refresh_token = store.get_secret(namespace, REFRESH_TOKEN_KEY).await?;
    Ok(Some(OAuthCredential { access_token, refresh_token }))
}

/// Delete both tokens (idempotent).
pub async fn clear_credential(
    store: &dyn SecretStore,
    namespace: &str,
) -> Result<(), KeychainError> {
    debug!(namespace, "Deleting OAuth tokens");

    store.delete_secret(namespace, ACCESS_TOKEN_KEY).await?;
    store.delete_secret(namespace, REFRESH_TOKEN_KEY).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemorySecretStore;

    const NS: &str = "remote-calendar";

    #[tokio::test]
    async fn store_and_load_roundtrip() {
        let store = MemorySecretStore::new();
        let credential =
            OAuthCredential { access_token: "a".into(), refresh_token: Some("r".into()) };

        store_credential(&store, NS, &credential).await.unwrap();

        assert_eq!(load_credential(&store, NS).await.unwrap(), Some(credential));
        assert_eq!(store.get(NS, "access_token").as_deref(), Some("a"));
        assert_eq!(store.get(NS, "refresh_token").as_deref(), Some("r"));
    }

    #[tokio::test]
    async fn missing_refresh_token_keeps_previous_one() {
        let store = MemorySecretStore::new();
        store.insert(NS, "refresh_token", "old-refresh");

        let credential = OAuthCredential { access_token: "fresh".into(), refresh_token: None };
        store_credential(&store, NS, &credential).await.unwrap();

        assert_eq!(store.get(NS, "refresh_token").as_deref(), Some("old-refresh"));
    }

    #[tokio::test]
    async fn clear_is_idempotent_and_namespaced() {
        let store = MemorySecretStore::new();
        store.insert(NS, "access_token", "a");
        store.insert("other", "access_token", "keep");

        clear_credential(&store, NS).await.unwrap();
        clear_credential(&store, NS).await.unwrap();

        assert!(load_access_token(&store, NS).await.unwrap().is_none());
        assert_eq!(store.get("other", "access_token").as_deref(), Some("keep"));
    }
}
