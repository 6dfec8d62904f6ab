//! Calendar sync context - wires providers, stores and the engine from
//! [`Config`]

use std::sync::Arc;

use calsync_common::security::{KeychainProvider, SecretStore};
use calsync_core::{CalendarProvider, ConnectionStore, EventStore, SyncEngine};
use calsync_domain::{Config, Result};
use tracing::info;

use crate::integrations::calendar::local::{
    DeviceCalendar, JsonDeviceCalendar, LocalCalendarProvider, PermissionStatus,
};
use crate::integrations::calendar::remote::{
    AuthorizationSession, LoopbackAuthorizationSession, RemoteCalendarProvider,
};
use crate::storage::FileConnectionStore;

/// Service prefix for keychain entries.
pub const KEYCHAIN_SERVICE: &str = "calsync";

/// Everything the surrounding application needs to drive calendar sync
pub struct CalendarContext {
    pub config: Config,
    pub engine: Arc<SyncEngine>,
    pub device: Arc<JsonDeviceCalendar>,
    pub remote: Arc<RemoteCalendarProvider>,
}

impl CalendarContext {
    /// Production wiring: OS keychain and browser-based loopback consent.
    pub async fn new(config: Config, events: Arc<dyn EventStore>) -> Result<Self> {
        let secrets: Arc<dyn SecretStore> = Arc::new(KeychainProvider::new(KEYCHAIN_SERVICE));
        let session: Arc<dyn AuthorizationSession> =
            Arc::new(LoopbackAuthorizationSession::new(config.remote.auth_timeout()));
        Self::with_capabilities(config, events, secrets, session, PermissionStatus::NotDetermined)
            .await
    }

    /// Wiring with injected secret storage, consent session and initial
    /// device permission.
    pub async fn with_capabilities(
        config: Config,
        events: Arc<dyn EventStore>,
        secrets: Arc<dyn SecretStore>,
        session: Arc<dyn AuthorizationSession>,
        permission: PermissionStatus,
    ) -> Result<Self> {
        let tz = config.sync.tz()?;

        let device =
            Arc::new(JsonDeviceCalendar::open(&config.local.store_path, permission).await?);
        let device_port: Arc<dyn DeviceCalendar> = device.clone();
        let local: Arc<dyn CalendarProvider> = Arc::new(LocalCalendarProvider::new(device_port));

        let remote =
            Arc::new(RemoteCalendarProvider::new(config.remote.clone(), secrets, session, tz)?);
        let store: Arc<dyn ConnectionStore> =
            Arc::new(FileConnectionStore::new(&config.sync.state_path));

        let remote_port: Arc<dyn CalendarProvider> = remote.clone();
        let engine = SyncEngine::restore(local, remote_port, events, store).await;

        info!(
            state_path = %config.sync.state_path,
            device_store = %config.local.store_path,
            "Calendar sync context ready"
        );

        Ok(Self { config, engine: Arc::new(engine), device, remote })
    }
}
