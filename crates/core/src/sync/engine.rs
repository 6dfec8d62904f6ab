//! Sync engine - orchestrates the active provider, the connection state and
//! the local↔provider identity mapping.

use std::sync::Arc;

use calsync_domain::{
    CalSyncError, CalendarInfo, ConnectionState, Event, ProviderKind, Result, UpdateOutcome,
};
use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use super::connection::ConnectionHandle;
use super::ports::{ConnectionStore, EventStore};
use crate::calendar_ports::CalendarProvider;

/// Mirrors local events into the single connected calendar provider.
///
/// Owns the [`ConnectionState`] and is its only writer. Callers are expected
/// to serialize their own mutating calls; the engine does not guard against
/// concurrent `connect`/`disconnect`/`sync` from independent callers.
pub struct SyncEngine {
    local: Arc<dyn CalendarProvider>,
    remote: Arc<dyn CalendarProvider>,
    events: Arc<dyn EventStore>,
    store: Arc<dyn ConnectionStore>,
    connection: ConnectionHandle,
}

impl SyncEngine {
    /// Create an engine with a fresh, disconnected state
    pub fn new(
        local: Arc<dyn CalendarProvider>,
        remote: Arc<dyn CalendarProvider>,
        events: Arc<dyn EventStore>,
        store: Arc<dyn ConnectionStore>,
    ) -> Self {
        Self::with_state(local, remote, events, store, ConnectionState::default())
    }

    /// Create an engine from the persisted connection state.
    ///
    /// A missing or unreadable state falls back to the defaults.
    pub async fn restore(
        local: Arc<dyn CalendarProvider>,
        remote: Arc<dyn CalendarProvider>,
        events: Arc<dyn EventStore>,
        store: Arc<dyn ConnectionStore>,
    ) -> Self {
        let state = match store.load().await {
            Ok(Some(state)) => {
                info!(
                    provider = %state.provider,
                    enabled = state.sync_enabled,
                    "Restored connection state"
                );
                state
            }
            Ok(None) => ConnectionState::default(),
            Err(err) => {
                warn!(
                    error = %err,
                    kind = err.label(),
                    "Failed to load connection state, using defaults"
                );
                ConnectionState::default()
            }
        };
        Self::with_state(local, remote, events, store, state)
    }

    fn with_state(
        local: Arc<dyn CalendarProvider>,
        remote: Arc<dyn CalendarProvider>,
        events: Arc<dyn EventStore>,
        store: Arc<dyn ConnectionStore>,
        state: ConnectionState,
    ) -> Self {
        Self { local, remote, events, store, connection: ConnectionHandle::new(state) }
    }

    /// Snapshot of the current connection
    pub fn connection(&self) -> ConnectionState {
        self.connection.snapshot()
    }

    /// Read-only stream of connection changes
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.connection.subscribe()
    }

    fn provider(&self, kind: ProviderKind) -> Result<&Arc<dyn CalendarProvider>> {
        match kind {
            ProviderKind::Local => Ok(&self.local),
            ProviderKind::Remote => Ok(&self.remote),
            ProviderKind::None => {
                Err(CalSyncError::InvalidInput("No calendar provider selected".to_string()))
            }
        }
    }

    /// Whether `kind` currently holds authorization
    pub async fn is_authenticated(&self, kind: ProviderKind) -> bool {
        match self.provider(kind) {
            Ok(provider) => provider.is_authenticated().await,
            Err(_) => false,
        }
    }

    /// Writable calendars offered by `kind`, for the calendar picker
    #[instrument(skip(self))]
    pub async fn list_calendars(&self, kind: ProviderKind) -> Result<Vec<CalendarInfo>> {
        self.provider(kind)?.list_calendars().await
    }

    /// Connect to a device calendar. Requires local calendar access.
    pub async fn connect_local(
        &self,
        calendar_id: impl Into<String>,
        calendar_name: impl Into<String>,
    ) -> Result<()> {
        self.connect(ProviderKind::Local, calendar_id.into(), calendar_name.into()).await
    }

    /// Connect to a remote calendar. Runs the OAuth flow first.
    pub async fn connect_remote(
        &self,
        calendar_id: impl Into<String>,
        calendar_name: impl Into<String>,
    ) -> Result<()> {
        self.connect(ProviderKind::Remote, calendar_id.into(), calendar_name.into()).await
    }

    #[instrument(skip(self, calendar_name))]
    async fn connect(
        &self,
        kind: ProviderKind,
        calendar_id: String,
        calendar_name: String,
    ) -> Result<()> {
        let provider = Arc::clone(self.provider(kind)?);
        let previous = self.connection.update(|state| state.authenticating = Some(kind));

        if let Err(err) = provider.request_access().await {
            warn!(error = %err, kind = err.label(), "Provider authorization failed");
            self.connection.update(|state| state.authenticating = None);
            return Err(err);
        }

        if previous.provider == ProviderKind::Remote && kind != ProviderKind::Remote {
            if let Err(err) = self.remote.sign_out().await {
                warn!(
                    error = %err,
                    "Failed to sign out of remote calendar while switching provider"
                );
            }
        }

        let mut next = previous;
        next.connect(kind, calendar_id, calendar_name);

        if let Err(err) = self.store.save(&next).await {
            self.connection.update(|state| state.authenticating = None);
            return Err(err);
        }
        self.connection.replace(next);

        info!(provider = %kind, "Calendar connected");
        Ok(())
    }

    /// Disconnect from the active provider and clear all connection state.
    ///
    /// The in-memory state is always reset; a failure to sign out is logged,
    /// a failure to clear the persisted copy is returned.
    #[instrument(skip(self))]
    pub async fn disconnect(&self) -> Result<()> {
        let current = self.connection.snapshot();

        if current.provider == ProviderKind::Remote {
            if let Err(err) = self.remote.sign_out().await {
                warn!(error = %err, "Remote sign-out failed during disconnect");
            }
        }

        self.connection.replace(ConnectionState::default());
        self.store.clear().await?;

        info!(previous = %current.provider, "Calendar disconnected");
        Ok(())
    }

    /// Set whether the event's source URL is appended to provider notes
    pub async fn set_include_source_links(&self, include: bool) -> Result<()> {
        let mut next = self.connection.snapshot();
        next.include_source_links = include;
        self.store.save(&next).await?;
        self.connection.replace(next);
        Ok(())
    }

    /// Mirror one event into the connected provider.
    ///
    /// No-op when sync is disabled. The event is re-read from the event store
    /// so a stale caller copy cannot trigger a second create. Returns the
    /// event as stored after the sync.
    #[instrument(skip(self, event), fields(event_id = %event.id))]
    pub async fn sync_event(&self, event: &Event) -> Result<Event> {
        let state = self.connection.snapshot();
        if !state.is_enabled() {
            debug!("Sync disabled, skipping event");
            return Ok(event.clone());
        }

        let current = self.events.get(&event.id).await?.unwrap_or_else(|| event.clone());
        let synced = self.push(current, &state).await?;

        let next = self.connection.update(|state| state.last_sync_at = Some(Utc::now()));
        self.store.save(&next).await?;

        Ok(synced)
    }

    /// Sync every stored event, one at a time.
    ///
    /// A failing event is logged and skipped. Only a failure to list the
    /// events is returned.
    #[instrument(skip(self))]
    pub async fn sync_all_events(&self) -> Result<()> {
        if !self.connection.snapshot().is_enabled() {
            debug!("Sync disabled, skipping full sync");
            return Ok(());
        }

        let events = self.events.list().await?;
        let attempted = events.len();
        let mut synced = 0usize;

        for event in &events {
            match self.sync_event(event).await {
                Ok(_) => synced += 1,
                Err(err) => {
                    warn!(
                        event_id = %event.id,
                        error = %err,
                        kind = err.label(),
                        "Failed to sync event"
                    );
                }
            }
        }

        info!(attempted, synced, failed = attempted - synced, "Full sync finished");
        Ok(())
    }

    /// Push an edited event to the connected provider.
    ///
    /// Updates when the event is already linked, creates and links
    /// otherwise. Does not touch `last_sync_at`.
    #[instrument(skip(self, event), fields(event_id = %event.id))]
    pub async fn update_calendar_event(&self, event: &Event) -> Result<Event> {
        let state = self.connection.snapshot();
        if !state.is_enabled() {
            debug!("Sync disabled, skipping update");
            return Ok(event.clone());
        }

        self.push(event.clone(), &state).await
    }

    /// Delete the provider event linked to `event`, if any.
    #[instrument(skip(self, event), fields(event_id = %event.id))]
    pub async fn delete_calendar_event(&self, event: &Event) -> Result<()> {
        let Some(kind) = event.linked_provider() else {
            debug!("Event not linked to a calendar, nothing to delete");
            return Ok(());
        };
        let Some(remote_id) = event.calendar_event_id(kind) else {
            return Ok(());
        };

        let state = self.connection.snapshot();
        let calendar_id =
            if state.provider == kind { state.selected_calendar_id.as_deref() } else { None };

        self.provider(kind)?.delete_event(remote_id, calendar_id).await?;
        info!(provider = %kind, "Calendar event deleted");
        Ok(())
    }

    /// Create-or-update against the connected provider and persist any new
    /// identity link.
    async fn push(&self, mut event: Event, state: &ConnectionState) -> Result<Event> {
        let kind = state.provider;
        let provider = self.provider(kind)?;
        let calendar_id = state
            .selected_calendar_id
            .as_deref()
            .ok_or_else(|| CalSyncError::CalendarNotFound("No calendar selected".to_string()))?;
        let include_links = state.include_source_links;

        if let Some(remote_id) = event.calendar_event_id(kind) {
            match provider.update_event(&event, remote_id, calendar_id, include_links).await? {
                UpdateOutcome::Updated => {
                    debug!(provider = %kind, "Calendar event updated");
                }
                UpdateOutcome::Recreated(new_id) => {
                    info!(provider = %kind, "Calendar event recreated, relinking");
                    event.link(kind, new_id);
                    self.events.update(&event).await?;
                }
            }
        } else {
            let new_id = provider.create_event(&event, calendar_id, include_links).await?;
            event.link(kind, new_id);
            self.events.update(&event).await?;
            info!(provider = %kind, "Calendar event created");
        }

        Ok(event)
    }
}
