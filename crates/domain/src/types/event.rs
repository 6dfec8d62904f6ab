//! Local event record and its provider identity fields

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::connection::ProviderKind;

/// A user's locally stored event.
///
/// The descriptive fields are copied verbatim into provider payloads. The two
/// identity fields link the record to the event created in a provider; at most
/// one of them is populated at any time (see [`Event::link`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub event_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub url_link: Option<String>,
    pub local_calendar_event_id: Option<String>,
    pub remote_calendar_event_id: Option<String>,
}

/// Per-event sync state, derived from the identity fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSyncState {
    Unsynced,
    Synced(ProviderKind),
}

impl Event {
    /// Create an unsynced event with only the required fields set.
    pub fn new(id: impl Into<String>, name: impl Into<String>, event_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            event_date,
            start_time: None,
            end_time: None,
            location: None,
            notes: None,
            url_link: None,
            local_calendar_event_id: None,
            remote_calendar_event_id: None,
        }
    }

    #[must_use]
    pub const fn with_times(mut self, start: Option<NaiveTime>, end: Option<NaiveTime>) -> Self {
        self.start_time = start;
        self.end_time = end;
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn with_url_link(mut self, url: impl Into<String>) -> Self {
        self.url_link = Some(url.into());
        self
    }

    /// Provider-assigned id for `provider`, if populated.
    ///
    /// Empty strings count as unpopulated.
    pub fn calendar_event_id(&self, provider: ProviderKind) -> Option<&str> {
        let field = match provider {
            ProviderKind::Local => &self.local_calendar_event_id,
            ProviderKind::Remote => &self.remote_calendar_event_id,
            ProviderKind::None => return None,
        };
        field.as_deref().filter(|id| !id.is_empty())
    }

    /// The provider this event is currently linked to.
    pub fn linked_provider(&self) -> Option<ProviderKind> {
        [ProviderKind::Local, ProviderKind::Remote]
            .into_iter()
            .find(|provider| self.calendar_event_id(*provider).is_some())
    }

    pub fn sync_state(&self) -> EventSyncState {
        self.linked_provider().map_or(EventSyncState::Unsynced, EventSyncState::Synced)
    }

    /// Record the provider identity for this event.
    ///
    /// Populates the field matching `provider` and clears the other one, so an
    /// event is linked to at most one provider. Linking to
    /// [`ProviderKind::None`] leaves the event untouched.
    pub fn link(&mut self, provider: ProviderKind, remote_id: impl Into<String>) {
        match provider {
            ProviderKind::Local => {
                self.local_calendar_event_id = Some(remote_id.into());
                self.remote_calendar_event_id = None;
            }
            ProviderKind::Remote => {
                self.remote_calendar_event_id = Some(remote_id.into());
                self.local_calendar_event_id = None;
            }
            ProviderKind::None => {}
        }
    }
}
