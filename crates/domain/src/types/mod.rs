//! Domain types and models

pub mod calendar;
pub mod connection;
pub mod event;

pub use calendar::{CalendarInfo, UpdateOutcome};
pub use connection::{ConnectionState, ConnectionStatus, ProviderKind};
pub use event::{Event, EventSyncState};
