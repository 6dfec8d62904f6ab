//! Calendar provider port
//!
//! One capability interface implemented by both the device calendar client
//! and the remote REST client. The engine picks an implementation by
//! [`ProviderKind`].

use async_trait::async_trait;
use calsync_domain::{CalendarInfo, Event, ProviderKind, Result, UpdateOutcome};

/// Uniform calendar backend operations
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Which backend this is
    fn kind(&self) -> ProviderKind;

    /// Obtain or renew authorization.
    ///
    /// Local: OS permission prompt (only from the undetermined state).
    /// Remote: the full OAuth2 + PKCE flow.
    async fn request_access(&self) -> Result<()>;

    /// Whether authorization is currently held. Never touches the network.
    async fn is_authenticated(&self) -> bool;

    /// Calendars the active account can write to
    async fn list_calendars(&self) -> Result<Vec<CalendarInfo>>;

    /// Create the event and return the provider-assigned id
    async fn create_event(
        &self,
        event: &Event,
        calendar_id: &str,
        include_source_links: bool,
    ) -> Result<String>;

    /// Update the event identified by `remote_event_id`
    async fn update_event(
        &self,
        event: &Event,
        remote_event_id: &str,
        calendar_id: &str,
        include_source_links: bool,
    ) -> Result<UpdateOutcome>;

    /// Delete the event identified by `remote_event_id`
    async fn delete_event(&self, remote_event_id: &str, calendar_id: Option<&str>) -> Result<()>;

    /// Drop any held authorization
    async fn sign_out(&self) -> Result<()>;
}
