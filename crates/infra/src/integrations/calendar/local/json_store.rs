//! JSON-file-backed [`DeviceCalendar`]
//!
//! Stands in for the OS calendar store off-device: calendars and event
//! records live in one JSON document, records get UUID ids, and the
//! permission state is fixed at construction (plus the answer a prompt would
//! give).

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use calsync_domain::{CalSyncError, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::device::{DeviceCalendar, DeviceCalendarInfo, DeviceEventRecord, PermissionStatus};
use crate::storage::json_file::{read_json, write_json_atomic};

const DEFAULT_CALENDAR_TITLE: &str = "Calendar";
const DEFAULT_SOURCE: &str = "On My Device";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Document {
    calendars: Vec<DeviceCalendarInfo>,
    events: BTreeMap<String, DeviceEventRecord>,
}

impl Document {
    fn seeded() -> Self {
        Self {
            calendars: vec![DeviceCalendarInfo {
                id: Uuid::new_v4().to_string(),
                title: DEFAULT_CALENDAR_TITLE.to_string(),
                source: DEFAULT_SOURCE.to_string(),
                color: None,
                allows_modification: true,
            }],
            events: BTreeMap::new(),
        }
    }

    fn writable_calendar(&self, calendar_id: &str) -> Result<()> {
        match self.calendars.iter().find(|calendar| calendar.id == calendar_id) {
            Some(calendar) if calendar.allows_modification => Ok(()),
            Some(_) => Err(CalSyncError::EventCreationFailed(format!(
                "Calendar {calendar_id} is read-only"
            ))),
            None => Err(CalSyncError::CalendarNotFound(calendar_id.to_string())),
        }
    }
}

/// Device calendar persisted to a JSON file
pub struct JsonDeviceCalendar {
    path: PathBuf,
    prompt_response: PermissionStatus,
    permission: StdMutex<PermissionStatus>,
    document: Mutex<Document>,
}

impl JsonDeviceCalendar {
    /// Open (or seed) the calendar file at `path`.
    ///
    /// A new file starts with a single writable calendar.
    pub async fn open(path: impl Into<PathBuf>, permission: PermissionStatus) -> Result<Self> {
        let path = path.into();
        let document = match read_json::<Document>(&path).await? {
            Some(document) => document,
            None => {
                let document = Document::seeded();
                write_json_atomic(&path, &document).await?;
                document
            }
        };

        debug!(
            path = %path.display(),
            calendars = document.calendars.len(),
            "Opened device calendar"
        );

        Ok(Self {
            path,
            prompt_response: PermissionStatus::FullAccess,
            permission: StdMutex::new(permission),
            document: Mutex::new(document),
        })
    }

    /// What the simulated permission prompt answers. Defaults to full access.
    #[must_use]
    pub fn with_prompt_response(mut self, response: PermissionStatus) -> Self {
        self.prompt_response = response;
        self
    }

    /// Add a calendar collection and return its id
    pub async fn add_calendar(
        &self,
        title: impl Into<String>,
        allows_modification: bool,
    ) -> Result<String> {
        let mut document = self.document.lock().await;
        let id = Uuid::new_v4().to_string();
        let mut next = document.clone();
        next.calendars.push(DeviceCalendarInfo {
            id: id.clone(),
            title: title.into(),
            source: DEFAULT_SOURCE.to_string(),
            color: None,
            allows_modification,
        });
        self.commit(&mut document, next).await?;
        Ok(id)
    }

    /// Write `next` to disk, then make it the in-memory document.
    ///
    /// A failed write leaves `current` untouched.
    async fn commit(&self, current: &mut Document, next: Document) -> Result<()> {
        write_json_atomic(&self.path, &next).await?;
        *current = next;
        Ok(())
    }
}

#[async_trait]
impl DeviceCalendar for JsonDeviceCalendar {
    fn permission_status(&self) -> PermissionStatus {
        match self.permission.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    async fn request_permission(&self) -> Result<PermissionStatus> {
        let mut permission = match self.permission.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *permission == PermissionStatus::NotDetermined {
            debug!(response = ?self.prompt_response, "Answering calendar permission prompt");
            *permission = self.prompt_response;
        }
        Ok(*permission)
    }

    async fn calendars(&self) -> Result<Vec<DeviceCalendarInfo>> {
        Ok(self.document.lock().await.calendars.clone())
    }

    async fn get_event(&self, event_id: &str) -> Result<Option<DeviceEventRecord>> {
        Ok(self.document.lock().await.events.get(event_id).cloned())
    }

    async fn insert_event(&self, record: DeviceEventRecord) -> Result<String> {
        let mut document = self.document.lock().await;
        document.writable_calendar(&record.calendar_id)?;

        let id = Uuid::new_v4().to_string();
        let mut next = document.clone();
        next.events.insert(id.clone(), record);
        self.commit(&mut document, next).await?;
        Ok(id)
    }

    async fn replace_event(&self, event_id: &str, record: DeviceEventRecord) -> Result<()> {
        let mut document = self.document.lock().await;
        document.writable_calendar(&record.calendar_id)?;

        if !document.events.contains_key(event_id) {
            return Err(CalSyncError::EventCreationFailed(format!(
                "No device event with id {event_id}"
            )));
        }
        let mut next = document.clone();
        next.events.insert(event_id.to_string(), record);
        self.commit(&mut document, next).await
    }

    async fn remove_event(&self, event_id: &str) -> Result<bool> {
        let mut document = self.document.lock().await;
        if !document.events.contains_key(event_id) {
            return Ok(false);
        }
        let mut next = document.clone();
        next.events.remove(event_id);
        self.commit(&mut document, next).await?;
        Ok(true)
    }
}
