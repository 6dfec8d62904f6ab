//! Shared test helpers for `calsync-core` integration tests.
//!
//! Recording provider mocks, an in-memory event store and a connection store
//! so engine tests can focus on behaviour instead of boilerplate.

pub mod providers;
pub mod stores;

use chrono::{NaiveDate, NaiveTime};
use calsync_domain::Event;

/// Unsynced event on a fixed date
pub fn event(id: &str, name: &str) -> Event {
    Event::new(id, name, NaiveDate::from_ymd_opt(2025, 9, 12).unwrap())
}

/// Unsynced event starting at `hour:00`
pub fn timed_event(id: &str, name: &str, hour: u32) -> Event {
    event(id, name).with_times(NaiveTime::from_hms_opt(hour, 0, 0), None)
}
