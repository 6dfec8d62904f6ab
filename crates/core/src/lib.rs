//! # CalSync Core
//!
//! Pure sync logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for calendar providers and local stores
//! - Provider-agnostic payload composition (notes, schedule)
//! - The connection state holder and the [`SyncEngine`]
//!
//! ## Architecture Principles
//! - Only depends on `calsync-domain`
//! - No HTTP, filesystem, or platform code
//! - All external collaborators via traits

pub mod calendar_ports;
pub mod payload;
pub mod sync;

pub use calendar_ports::CalendarProvider;
pub use payload::{compose_notes, EventSchedule};
pub use sync::connection::ConnectionHandle;
pub use sync::engine::SyncEngine;
pub use sync::ports::{ConnectionStore, EventStore};
