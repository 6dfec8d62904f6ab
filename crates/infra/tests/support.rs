//! Shared helpers for infra integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use calsync_common::testing::MemorySecretStore;
use calsync_core::EventStore;
use calsync_domain::{Config, Event, Result as DomainResult};
use calsync_infra::calendar::local::PermissionStatus;
use calsync_infra::calendar::remote::{AuthorizationSession, SessionOutcome};
use calsync_infra::CalendarContext;
use chrono::{NaiveDate, NaiveTime};
use tempfile::TempDir;
use url::Url;
use wiremock::MockServer;

/// In-memory event store shared between the test and the engine.
#[derive(Default, Clone)]
pub struct MemoryEventStore {
    events: Arc<Mutex<Vec<Event>>>,
}

impl MemoryEventStore {
    pub fn with(events: Vec<Event>) -> Self {
        Self { events: Arc::new(Mutex::new(events)) }
    }

    pub fn get(&self, id: &str) -> Event {
        self.events
            .lock()
            .unwrap()
            .iter()
            .find(|event| event.id == id)
            .cloned()
            .expect("event should exist")
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn get(&self, id: &str) -> DomainResult<Option<Event>> {
        Ok(self.events.lock().unwrap().iter().find(|event| event.id == id).cloned())
    }

    async fn update(&self, event: &Event) -> DomainResult<()> {
        let mut events = self.events.lock().unwrap();
        match events.iter_mut().find(|stored| stored.id == event.id) {
            Some(stored) => *stored = event.clone(),
            None => events.push(event.clone()),
        }
        Ok(())
    }

    async fn list(&self) -> DomainResult<Vec<Event>> {
        Ok(self.events.lock().unwrap().clone())
    }
}

/// Consent session that approves immediately, echoing the request's state.
pub struct ApprovingSession;

#[async_trait]
impl AuthorizationSession for ApprovingSession {
    async fn present(
        &self,
        authorization_url: &Url,
        redirect_uri: &Url,
    ) -> DomainResult<SessionOutcome> {
        let state = authorization_url
            .query_pairs()
            .find(|(key, _)| key == "state")
            .map(|(_, value)| value.into_owned())
            .expect("authorization URL carries state");

        let mut callback = redirect_uri.clone();
        callback.query_pairs_mut().append_pair("code", "auth-code").append_pair("state", &state);
        Ok(SessionOutcome::Callback(callback))
    }
}

/// Temp-dir backed config pointing the remote client at `server`.
pub fn test_config(dir: &TempDir, server: &MockServer) -> Config {
    let mut config = Config::default();
    config.remote.client_id = "integration-client".into();
    config.remote.token_endpoint = format!("{}/token", server.uri());
    config.remote.api_base_url = format!("{}/calendar/v3", server.uri());
    config.local.store_path = dir.path().join("device.json").display().to_string();
    config.sync.state_path = dir.path().join("state.json").display().to_string();
    config
}

pub async fn context(
    config: Config,
    events: &MemoryEventStore,
    secrets: &MemorySecretStore,
) -> CalendarContext {
    CalendarContext::with_capabilities(
        config,
        Arc::new(events.clone()),
        Arc::new(secrets.clone()),
        Arc::new(ApprovingSession),
        PermissionStatus::NotDetermined,
    )
    .await
    .expect("context should build")
}

pub fn event(id: &str, name: &str) -> Event {
    Event::new(id, name, NaiveDate::from_ymd_opt(2025, 9, 12).unwrap())
}

pub fn evening_event(id: &str, name: &str) -> Event {
    event(id, name).with_times(NaiveTime::from_hms_opt(19, 0, 0), None)
}
