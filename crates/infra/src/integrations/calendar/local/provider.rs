//! Local calendar provider client
//!
//! Maps engine operations onto a [`DeviceCalendar`]. Every failure except a
//! missing permission surfaces as `EventCreationFailed`; updates of a record
//! that vanished out-of-band fall back to creating a new one.

use std::sync::Arc;

use async_trait::async_trait;
use calsync_core::{compose_notes, CalendarProvider, EventSchedule};
use calsync_domain::{CalSyncError, CalendarInfo, Event, ProviderKind, Result, UpdateOutcome};
use tracing::{debug, info, instrument, warn};

use super::device::{DeviceCalendar, DeviceEventRecord, PermissionStatus};

const SETTINGS_HINT: &str = "enable calendar access for this app in System Settings";

/// [`CalendarProvider`] backed by the device calendar
pub struct LocalCalendarProvider {
    device: Arc<dyn DeviceCalendar>,
}

impl LocalCalendarProvider {
    pub fn new(device: Arc<dyn DeviceCalendar>) -> Self {
        Self { device }
    }

    fn ensure_write_access(&self) -> Result<()> {
        let status = self.device.permission_status();
        if status.is_granted() {
            Ok(())
        } else {
            Err(CalSyncError::PermissionDenied(format!(
                "Calendar access is {status:?}; {SETTINGS_HINT}"
            )))
        }
    }

    fn build_record(event: &Event, calendar_id: &str, include_links: bool) -> DeviceEventRecord {
        let schedule = EventSchedule::for_event(event);
        DeviceEventRecord {
            calendar_id: calendar_id.to_string(),
            title: event.name.clone(),
            location: event.location.clone(),
            notes: compose_notes(event, include_links),
            start: schedule.start(),
            end: schedule.end(),
            is_all_day: schedule.is_all_day(),
        }
    }
}

/// Collapse device errors into the provider's error surface.
fn write_failure(err: CalSyncError) -> CalSyncError {
    match err {
        CalSyncError::PermissionDenied(_) | CalSyncError::EventCreationFailed(_) => err,
        other => CalSyncError::EventCreationFailed(other.to_string()),
    }
}

#[async_trait]
impl CalendarProvider for LocalCalendarProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Local
    }

    #[instrument(skip(self))]
    async fn request_access(&self) -> Result<()> {
        match self.device.permission_status() {
            status if status.is_granted() => Ok(()),
            PermissionStatus::NotDetermined => {
                let answer = self.device.request_permission().await?;
                info!(?answer, "Calendar permission prompt answered");
                if answer.is_granted() {
                    Ok(())
                } else {
                    Err(CalSyncError::PermissionDenied("Calendar access was not granted".into()))
                }
            }
            status => {
                warn!(?status, "Calendar permission previously refused, not prompting again");
                Err(CalSyncError::PermissionDenied(format!(
                    "Calendar access is {status:?}; {SETTINGS_HINT}"
                )))
            }
        }
    }

    async fn is_authenticated(&self) -> bool {
        self.device.permission_status().is_granted()
    }

    async fn list_calendars(&self) -> Result<Vec<CalendarInfo>> {
        let status = self.device.permission_status();
        if !status.can_read() {
            return Err(CalSyncError::PermissionDenied(format!(
                "Listing calendars requires full access (currently {status:?})"
            )));
        }

        let calendars = self.device.calendars().await?;
        Ok(calendars
            .into_iter()
            .filter(|calendar| calendar.allows_modification)
            .map(|calendar| CalendarInfo {
                id: calendar.id,
                title: calendar.title,
                source: calendar.source,
                color: calendar.color,
                provider: ProviderKind::Local,
                allows_modification: true,
            })
            .collect())
    }

    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn create_event(
        &self,
        event: &Event,
        calendar_id: &str,
        include_source_links: bool,
    ) -> Result<String> {
        self.ensure_write_access()?;
        let record = Self::build_record(event, calendar_id, include_source_links);
        let id = self.device.insert_event(record).await.map_err(write_failure)?;
        debug!("Device event created");
        Ok(id)
    }

    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn update_event(
        &self,
        event: &Event,
        remote_event_id: &str,
        calendar_id: &str,
        include_source_links: bool,
    ) -> Result<UpdateOutcome> {
        self.ensure_write_access()?;
        let record = Self::build_record(event, calendar_id, include_source_links);

        let existing = self.device.get_event(remote_event_id).await.map_err(write_failure)?;
        if existing.is_none() {
            info!(remote_event_id, "Device event no longer exists, recreating");
            let id = self.device.insert_event(record).await.map_err(write_failure)?;
            return Ok(UpdateOutcome::Recreated(id));
        }

        self.device.replace_event(remote_event_id, record).await.map_err(write_failure)?;
        Ok(UpdateOutcome::Updated)
    }

    #[instrument(skip(self))]
    async fn delete_event(&self, remote_event_id: &str, _calendar_id: Option<&str>) -> Result<()> {
        self.ensure_write_access()?;
        let removed = self.device.remove_event(remote_event_id).await.map_err(write_failure)?;
        if !removed {
            debug!("Device event already absent");
        }
        Ok(())
    }

    async fn sign_out(&self) -> Result<()> {
        Ok(())
    }
}
