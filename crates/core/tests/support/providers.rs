use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use calsync_core::CalendarProvider;
use calsync_domain::{
    CalSyncError, CalendarInfo, Event, ProviderKind, Result as DomainResult, UpdateOutcome,
};

/// A provider call as observed by [`MockProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    RequestAccess,
    ListCalendars,
    Create { event_id: String, calendar_id: String, include_links: bool },
    Update { event_id: String, remote_id: String, calendar_id: String },
    Delete { remote_id: String, calendar_id: Option<String> },
    SignOut,
}

#[derive(Default)]
struct MockState {
    calls: Vec<ProviderCall>,
    next_id: usize,
    deny_access: bool,
    fail_events: HashSet<String>,
    update_error: Option<CalSyncError>,
    recreate_on_update: bool,
    authenticated: bool,
}

/// Recording [`CalendarProvider`] with failure injection.
///
/// Created ids look like `"<kind>-<n>"`. Clones share state.
#[derive(Clone)]
pub struct MockProvider {
    kind: ProviderKind,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    pub fn new(kind: ProviderKind) -> Self {
        Self { kind, state: Arc::new(Mutex::new(MockState::default())) }
    }

    pub fn local() -> Self {
        Self::new(ProviderKind::Local)
    }

    pub fn remote() -> Self {
        Self::new(ProviderKind::Remote)
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn deny_access(&self) {
        self.state.lock().unwrap().deny_access = true;
    }

    /// Make create/update fail for the given event id
    pub fn fail_for(&self, event_id: &str) {
        self.state.lock().unwrap().fail_events.insert(event_id.to_string());
    }

    /// Make every update fail with `error`
    pub fn fail_updates_with(&self, error: CalSyncError) {
        self.state.lock().unwrap().update_error = Some(error);
    }

    /// Make every update report that the event was recreated
    pub fn recreate_on_update(&self) {
        self.state.lock().unwrap().recreate_on_update = true;
    }

    pub fn count(&self, matcher: impl Fn(&ProviderCall) -> bool) -> usize {
        self.calls().iter().filter(|call| matcher(call)).count()
    }

    fn next_id(&self, state: &mut MockState) -> String {
        state.next_id += 1;
        format!("{}-{}", self.kind, state.next_id)
    }
}

#[async_trait]
impl CalendarProvider for MockProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn request_access(&self) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ProviderCall::RequestAccess);
        if state.deny_access {
            return Err(match self.kind {
                ProviderKind::Remote => CalSyncError::AuthenticationFailed("cancelled".into()),
                _ => CalSyncError::PermissionDenied("denied".into()),
            });
        }
        state.authenticated = true;
        Ok(())
    }

    async fn is_authenticated(&self) -> bool {
        self.state.lock().unwrap().authenticated
    }

    async fn list_calendars(&self) -> DomainResult<Vec<CalendarInfo>> {
        self.state.lock().unwrap().calls.push(ProviderCall::ListCalendars);
        Ok(vec![CalendarInfo {
            id: "cal-1".into(),
            title: "Personal".into(),
            source: "mock".into(),
            color: None,
            provider: self.kind,
            allows_modification: true,
        }])
    }

    async fn create_event(
        &self,
        event: &Event,
        calendar_id: &str,
        include_source_links: bool,
    ) -> DomainResult<String> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ProviderCall::Create {
            event_id: event.id.clone(),
            calendar_id: calendar_id.to_string(),
            include_links: include_source_links,
        });
        if state.fail_events.contains(&event.id) {
            return Err(CalSyncError::EventCreationFailed(format!("boom: {}", event.id)));
        }
        Ok(self.next_id(&mut state))
    }

    async fn update_event(
        &self,
        event: &Event,
        remote_event_id: &str,
        calendar_id: &str,
        _include_source_links: bool,
    ) -> DomainResult<UpdateOutcome> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ProviderCall::Update {
            event_id: event.id.clone(),
            remote_id: remote_event_id.to_string(),
            calendar_id: calendar_id.to_string(),
        });
        if let Some(err) = state.update_error.clone() {
            return Err(err);
        }
        if state.fail_events.contains(&event.id) {
            return Err(CalSyncError::EventCreationFailed(format!("boom: {}", event.id)));
        }
        if state.recreate_on_update {
            return Ok(UpdateOutcome::Recreated(self.next_id(&mut state)));
        }
        Ok(UpdateOutcome::Updated)
    }

    async fn delete_event(
        &self,
        remote_event_id: &str,
        calendar_id: Option<&str>,
    ) -> DomainResult<()> {
        self.state.lock().unwrap().calls.push(ProviderCall::Delete {
            remote_id: remote_event_id.to_string(),
            calendar_id: calendar_id.map(str::to_string),
        });
        Ok(())
    }

    async fn sign_out(&self) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ProviderCall::SignOut);
        state.authenticated = false;
        Ok(())
    }
}
