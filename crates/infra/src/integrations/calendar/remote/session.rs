//! Interactive authorization session
//!
//! The browser consent step of the OAuth flow, modelled as a capability that
//! resolves to the callback URL, a cancellation, or a timeout. Never left
//! pending: every outcome is mapped to a value before `present` returns.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{OriginalUri, Query};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use calsync_domain::{CalSyncError, Result};
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::errors::InfraError;

/// How an authorization session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The provider redirected back; carries the full callback URL.
    Callback(Url),
    /// The user dismissed the session.
    Cancelled,
    TimedOut,
}

/// Presents the provider's consent page and waits for the redirect
#[async_trait]
pub trait AuthorizationSession: Send + Sync {
    async fn present(&self, authorization_url: &Url, redirect_uri: &Url) -> Result<SessionOutcome>;
}

/// Browser + loopback HTTP listener session
///
/// Binds the host and port of the redirect URI, opens the authorization URL
/// in the system browser and resolves with the first request to the
/// redirect path.
pub struct LoopbackAuthorizationSession {
    timeout: Duration,
    open_browser: bool,
    cancel: Arc<Notify>,
}

impl LoopbackAuthorizationSession {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout, open_browser: true, cancel: Arc::new(Notify::new()) }
    }

    /// Skip launching the system browser (headless use and tests).
    #[must_use]
    pub const fn without_browser(mut self) -> Self {
        self.open_browser = false;
        self
    }

    /// Handle that dismisses a pending session
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(Arc::clone(&self.cancel))
    }
}

/// Dismisses the pending [`LoopbackAuthorizationSession`], if any
#[derive(Clone)]
pub struct CancelHandle(Arc<Notify>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.notify_waiters();
    }
}

#[async_trait]
impl AuthorizationSession for LoopbackAuthorizationSession {
    async fn present(&self, authorization_url: &Url, redirect_uri: &Url) -> Result<SessionOutcome> {
        let server = CallbackServer::start(redirect_uri).await?;

        if self.open_browser {
            if let Err(err) = open::that(authorization_url.as_str()) {
                warn!(error = %err, "Could not open browser, open the authorization URL manually");
                info!(url = %authorization_url, "Authorization URL");
            }
        }

        let outcome = tokio::select! {
            received = tokio::time::timeout(self.timeout, server.receiver) => match received {
                Ok(Ok(url)) => SessionOutcome::Callback(url),
                Ok(Err(_)) => SessionOutcome::Cancelled,
                Err(_) => SessionOutcome::TimedOut,
            },
            () = self.cancel.notified() => SessionOutcome::Cancelled,
        };

        debug!(?outcome, "Authorization session finished");
        server.shutdown.shutdown().await;
        Ok(outcome)
    }
}

struct CallbackServer {
    receiver: oneshot::Receiver<Url>,
    shutdown: ServerShutdown,
}

/// Stops the loopback listener; also runs on drop.
struct ServerShutdown {
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ServerShutdown {
    async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                if err.is_panic() {
                    error!("OAuth callback server panicked: {err}");
                }
            }
        }
    }
}

impl Drop for ServerShutdown {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                handle.abort();
            }
        }
    }
}

type CallbackSlot = Arc<StdMutex<Option<oneshot::Sender<Url>>>>;

impl CallbackServer {
    async fn start(redirect_uri: &Url) -> Result<Self> {
        let host = redirect_uri
            .host_str()
            .ok_or_else(|| CalSyncError::Config("Redirect URI has no host".into()))?;
        let port = redirect_uri
            .port_or_known_default()
            .ok_or_else(|| CalSyncError::Config("Redirect URI has no port".into()))?;
        let host = host.trim_start_matches('[').trim_end_matches(']');
        let addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .or_else(|_| format!("127.0.0.1:{port}").parse())
            .map_err(|e| CalSyncError::Config(format!("Invalid redirect address: {e}")))?;

        let listener = TcpListener::bind(addr).await.map_err(|err| {
            CalSyncError::AuthenticationFailed(format!(
                "Failed to bind OAuth loopback server on {addr}: {err}"
            ))
        })?;

        let base = redirect_uri.clone();
        let (callback_tx, callback_rx) = oneshot::channel();
        let slot: CallbackSlot = Arc::new(StdMutex::new(Some(callback_tx)));

        let path = match redirect_uri.path() {
            "" => "/",
            path => path,
        };
        let app = Router::new().route(
            path,
            get(move |uri: OriginalUri, query: Query<HashMap<String, String>>| {
                handle_callback(uri, query, base.clone(), Arc::clone(&slot))
            }),
        );

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
            {
                error!("OAuth callback server error: {}", err);
            }
        });

        debug!(%addr, path, "OAuth loopback server listening");

        Ok(Self {
            receiver: callback_rx,
            shutdown: ServerShutdown { shutdown_tx: Some(shutdown_tx), handle: Some(handle) },
        })
    }
}

async fn handle_callback(
    OriginalUri(uri): OriginalUri,
    Query(params): Query<HashMap<String, String>>,
    base: Url,
    slot: CallbackSlot,
) -> Html<&'static str> {
    let callback = match base.join(&uri.to_string()).map_err(InfraError::from) {
        Ok(url) => url,
        Err(InfraError(err)) => {
            warn!(error = %err, "Unparseable OAuth callback");
            return Html(FAILURE_PAGE);
        }
    };

    let sender = match slot.lock() {
        Ok(mut guard) => guard.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    };
    if let Some(sender) = sender {
        let _ = sender.send(callback);
    }

    if params.contains_key("code") && !params.contains_key("error") {
        Html(SUCCESS_PAGE)
    } else {
        Html(FAILURE_PAGE)
    }
}

const SUCCESS_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Authorization Complete</title></head>
<body><h1>Authorization Successful</h1><p>You can close this window.</p></body>
</html>"#;

const FAILURE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Authorization Failed</title></head>
<body><h1>Authorization Failed</h1><p>Return to the app and try again.</p></body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn free_port_redirect() -> Url {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        Url::parse(&format!("http://127.0.0.1:{port}/callback")).unwrap()
    }

    #[tokio::test]
    async fn resolves_with_callback_url() {
        let redirect = free_port_redirect();
        let session = LoopbackAuthorizationSession::new(Duration::from_secs(5)).without_browser();
        let auth_url = Url::parse("https://auth.example.com/authorize").unwrap();

        let target = redirect.clone();
        let browser = tokio::spawn(async move {
            let mut callback = target.clone();
            callback.set_query(Some("code=abc&state=xyz"));
            for _ in 0..50 {
                if reqwest::get(callback.as_str()).await.is_ok() {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        });

        let outcome = session.present(&auth_url, &redirect).await.unwrap();
        browser.await.unwrap();

        let SessionOutcome::Callback(url) = outcome else {
            panic!("expected callback, got {outcome:?}");
        };
        let pairs: HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs.get("code").map(String::as_str), Some("abc"));
        assert_eq!(pairs.get("state").map(String::as_str), Some("xyz"));
    }

    #[tokio::test]
    async fn times_out_without_callback() {
        let redirect = free_port_redirect();
        let session =
            LoopbackAuthorizationSession::new(Duration::from_millis(50)).without_browser();
        let auth_url = Url::parse("https://auth.example.com/authorize").unwrap();

        let outcome = session.present(&auth_url, &redirect).await.unwrap();
        assert_eq!(outcome, SessionOutcome::TimedOut);
    }

    #[tokio::test]
    async fn cancel_handle_dismisses_session() {
        let redirect = free_port_redirect();
        let session = LoopbackAuthorizationSession::new(Duration::from_secs(30)).without_browser();
        let cancel = session.cancel_handle();
        let auth_url = Url::parse("https://auth.example.com/authorize").unwrap();

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel.cancel();
        });

        let outcome = session.present(&auth_url, &redirect).await.unwrap();
        canceller.await.unwrap();
        assert_eq!(outcome, SessionOutcome::Cancelled);
    }

    #[tokio::test]
    async fn occupied_redirect_port_fails_authentication() {
        let held = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = held.local_addr().unwrap().port();
        let redirect = Url::parse(&format!("http://127.0.0.1:{port}/callback")).unwrap();
        let session = LoopbackAuthorizationSession::new(Duration::from_secs(5)).without_browser();
        let auth_url = Url::parse("https://auth.example.com/authorize").unwrap();

        let err = session.present(&auth_url, &redirect).await.unwrap_err();

        assert!(matches!(err, CalSyncError::AuthenticationFailed(_)), "got {err:?}");
        drop(held);
    }
}
