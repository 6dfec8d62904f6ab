//! Provider-agnostic event payload composition
//!
//! Both provider clients build their records from the same two pieces: the
//! composed notes body and the event's schedule. Only the wire shape differs.

use calsync_domain::constants::{DEFAULT_EVENT_DURATION_MINUTES, EVENT_LINK_PREFIX};
use calsync_domain::Event;
use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Notes body for a provider event.
///
/// The event's notes (if any), then a blank line and `Event Link: <url>` when
/// source links are enabled and the event has one. `None` when both parts
/// are absent.
pub fn compose_notes(event: &Event, include_source_links: bool) -> Option<String> {
    let notes = event.notes.as_deref().filter(|notes| !notes.is_empty());
    let link = event
        .url_link
        .as_deref()
        .filter(|link| include_source_links && !link.trim().is_empty());

    match (notes, link) {
        (Some(notes), Some(link)) => Some(format!("{notes}\n\n{EVENT_LINK_PREFIX}{link}")),
        (Some(notes), None) => Some(notes.to_string()),
        (None, Some(link)) => Some(format!("{EVENT_LINK_PREFIX}{link}")),
        (None, None) => None,
    }
}

/// When an event happens, in wall-clock terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSchedule {
    /// No start time: the event covers its whole calendar day.
    AllDay { date: NaiveDate },
    /// Explicit start; `end` is always after `start`.
    Timed { start: NaiveDateTime, end: NaiveDateTime },
}

impl EventSchedule {
    /// Derive the schedule from the event's date and times.
    ///
    /// Without an end time the event lasts one hour. An end time at or before
    /// the start time lands on the following day.
    pub fn for_event(event: &Event) -> Self {
        let Some(start_time) = event.start_time else {
            return Self::AllDay { date: event.event_date };
        };

        let start = event.event_date.and_time(start_time);
        let end = match event.end_time {
            Some(end_time) => {
                let end = event.event_date.and_time(end_time);
                if end <= start {
                    end + Duration::days(1)
                } else {
                    end
                }
            }
            None => start + Duration::minutes(DEFAULT_EVENT_DURATION_MINUTES),
        };

        Self::Timed { start, end }
    }

    pub const fn is_all_day(&self) -> bool {
        matches!(self, Self::AllDay { .. })
    }

    /// Start as a wall-clock timestamp (midnight for all-day events)
    pub fn start(&self) -> NaiveDateTime {
        match *self {
            Self::AllDay { date } => date.and_time(chrono::NaiveTime::MIN),
            Self::Timed { start, .. } => start,
        }
    }

    /// End as a wall-clock timestamp. All-day events end on their start day.
    pub fn end(&self) -> NaiveDateTime {
        match *self {
            Self::AllDay { date } => date.and_time(chrono::NaiveTime::MIN),
            Self::Timed { end, .. } => end,
        }
    }
}

/// Anchor a wall-clock time in `tz`.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant. Times that
/// do not exist (DST spring-forward gap) are moved forward by one hour.
pub fn localize(naive: NaiveDateTime, tz: Tz) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&naive)),
    }
}
