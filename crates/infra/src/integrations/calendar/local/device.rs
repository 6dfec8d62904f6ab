//! Device calendar capability
//!
//! The OS calendar subsystem reduced to what the local provider needs:
//! permission state, calendar listing and record CRUD by opaque id.

use async_trait::async_trait;
use calsync_domain::Result;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// OS-level calendar permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    /// The user has not been asked yet; only this state may prompt.
    #[default]
    NotDetermined,
    Denied,
    /// Blocked by device policy; the user cannot grant it.
    Restricted,
    FullAccess,
    WriteOnly,
}

impl PermissionStatus {
    /// Events may be written
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::FullAccess | Self::WriteOnly)
    }

    /// Calendars and events may be read back
    pub const fn can_read(self) -> bool {
        matches!(self, Self::FullAccess)
    }
}

/// A calendar collection on the device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCalendarInfo {
    pub id: String,
    pub title: String,
    pub source: String,
    pub color: Option<String>,
    pub allows_modification: bool,
}

/// An event record as the device calendar stores it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEventRecord {
    pub calendar_id: String,
    pub title: String,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub is_all_day: bool,
}

/// The on-device calendar store
#[async_trait]
pub trait DeviceCalendar: Send + Sync {
    /// Current permission, without prompting
    fn permission_status(&self) -> PermissionStatus;

    /// Show the OS prompt and return the user's answer.
    ///
    /// Only meaningful from [`PermissionStatus::NotDetermined`]; other states
    /// are returned unchanged.
    async fn request_permission(&self) -> Result<PermissionStatus>;

    async fn calendars(&self) -> Result<Vec<DeviceCalendarInfo>>;

    async fn get_event(&self, event_id: &str) -> Result<Option<DeviceEventRecord>>;

    /// Store a new record and return its provider-assigned id
    async fn insert_event(&self, record: DeviceEventRecord) -> Result<String>;

    /// Overwrite an existing record
    async fn replace_event(&self, event_id: &str, record: DeviceEventRecord) -> Result<()>;

    /// Remove a record. Returns `false` when no such record existed.
    async fn remove_event(&self, event_id: &str) -> Result<bool>;
}
