use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use calsync_core::{ConnectionStore, EventStore};
use calsync_domain::{CalSyncError, ConnectionState, Event, Result as DomainResult};

/// In-memory [`EventStore`] preserving insertion order.
#[derive(Default, Clone)]
pub struct MemoryEventStore {
    events: Arc<Mutex<Vec<Event>>>,
    update_count: Arc<Mutex<usize>>,
}

impl MemoryEventStore {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events: Arc::new(Mutex::new(events)), update_count: Arc::default() }
    }

    pub fn get_sync(&self, id: &str) -> Option<Event> {
        self.events.lock().unwrap().iter().find(|event| event.id == id).cloned()
    }

    pub fn all(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn update_count(&self) -> usize {
        *self.update_count.lock().unwrap()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn get(&self, id: &str) -> DomainResult<Option<Event>> {
        Ok(self.get_sync(id))
    }

    async fn update(&self, event: &Event) -> DomainResult<()> {
        *self.update_count.lock().unwrap() += 1;
        let mut events = self.events.lock().unwrap();
        match events.iter_mut().find(|stored| stored.id == event.id) {
            Some(stored) => *stored = event.clone(),
            None => events.push(event.clone()),
        }
        Ok(())
    }

    async fn list(&self) -> DomainResult<Vec<Event>> {
        Ok(self.all())
    }
}

/// Recording [`ConnectionStore`].
#[derive(Default, Clone)]
pub struct MemoryConnectionStore {
    saved: Arc<Mutex<Option<ConnectionState>>>,
    fail_load: Arc<Mutex<bool>>,
}

impl MemoryConnectionStore {
    pub fn with_state(state: ConnectionState) -> Self {
        let store = Self::default();
        *store.saved.lock().unwrap() = Some(state);
        store
    }

    pub fn failing_load() -> Self {
        let store = Self::default();
        *store.fail_load.lock().unwrap() = true;
        store
    }

    pub fn saved(&self) -> Option<ConnectionState> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConnectionStore for MemoryConnectionStore {
    async fn load(&self) -> DomainResult<Option<ConnectionState>> {
        if *self.fail_load.lock().unwrap() {
            return Err(CalSyncError::Storage("corrupt state file".into()));
        }
        Ok(self.saved())
    }

    async fn save(&self, state: &ConnectionState) -> DomainResult<()> {
        *self.saved.lock().unwrap() = Some(state.clone());
        Ok(())
    }

    async fn clear(&self) -> DomainResult<()> {
        *self.saved.lock().unwrap() = None;
        Ok(())
    }
}
