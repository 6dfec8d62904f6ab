//! Wire types for the remote calendar REST API

use calsync_core::compose_notes;
use calsync_core::payload::{localize, EventSchedule};
use calsync_domain::Event;
use chrono::Duration;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Event body for create (POST) and update (PUT)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventResource {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

/// Either an all-day `{date}` or a timed `{dateTime, timeZone}` pair
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventResource {
    /// Build the request body for `event`.
    ///
    /// All-day events end on the following date (exclusive end). Timed
    /// events carry RFC 3339 timestamps anchored in `tz`.
    pub fn from_event(event: &Event, include_source_links: bool, tz: Tz) -> Self {
        let (start, end) = match EventSchedule::for_event(event) {
            EventSchedule::AllDay { date } => (
                EventDateTime::all_day(&date.format("%Y-%m-%d").to_string()),
                EventDateTime::all_day(&(date + Duration::days(1)).format("%Y-%m-%d").to_string()),
            ),
            EventSchedule::Timed { start, end } => (
                EventDateTime::timed(localize(start, tz).to_rfc3339(), tz),
                EventDateTime::timed(localize(end, tz).to_rfc3339(), tz),
            ),
        };

        Self {
            summary: event.name.clone(),
            location: event.location.clone().filter(|location| !location.is_empty()),
            description: compose_notes(event, include_source_links),
            start,
            end,
        }
    }
}

impl EventDateTime {
    fn all_day(date: &str) -> Self {
        Self { date: Some(date.to_string()), ..Self::default() }
    }

    fn timed(date_time: String, tz: Tz) -> Self {
        Self { date: None, date_time: Some(date_time), time_zone: Some(tz.name().to_string()) }
    }
}

/// Response body of a successful create
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedEvent {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarListResponse {
    #[serde(default)]
    pub items: Vec<CalendarListEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListEntry {
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub summary_override: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub access_role: Option<String>,
    #[serde(default)]
    pub primary: bool,
}

impl CalendarListEntry {
    /// `owner` and `writer` roles can receive events.
    pub fn is_writable(&self) -> bool {
        matches!(self.access_role.as_deref(), Some("owner" | "writer"))
    }

    pub fn title(&self) -> String {
        self.summary_override
            .clone()
            .or_else(|| self.summary.clone())
            .unwrap_or_else(|| self.id.clone())
    }
}
