//! Port interfaces for the stores the sync engine reads and writes

use async_trait::async_trait;
use calsync_domain::{ConnectionState, Event, Result};

/// Local event store (owned by the event CRUD layer)
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Fetch a single event by id
    async fn get(&self, id: &str) -> Result<Option<Event>>;

    /// Overwrite a stored event
    async fn update(&self, event: &Event) -> Result<()>;

    /// All stored events, in the store's natural order
    async fn list(&self) -> Result<Vec<Event>>;
}

/// Durable storage for the connection state
#[async_trait]
pub trait ConnectionStore: Send + Sync {
    /// Load the persisted state, `None` when nothing was saved yet
    async fn load(&self) -> Result<Option<ConnectionState>>;

    /// Persist the state
    async fn save(&self, state: &ConnectionState) -> Result<()>;

    /// Remove any persisted state
    async fn clear(&self) -> Result<()>;
}
