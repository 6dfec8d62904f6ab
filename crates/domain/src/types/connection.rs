//! Connection state shared between the sync engine and its observers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Calendar backend an event can be mirrored into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    None,
    /// Device-local calendar store.
    Local,
    /// Remote REST calendar service reached via OAuth2.
    Remote,
}

impl_domain_status_conversions!(ProviderKind {
    None => "none",
    Local => "local",
    Remote => "remote",
});

/// Derived view of the connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Authenticating(ProviderKind),
    Connected(ProviderKind),
}

/// The single active provider selection plus its target calendar.
///
/// Persisted between runs; `authenticating` is transient and never written.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionState {
    pub provider: ProviderKind,
    pub selected_calendar_id: Option<String>,
    pub selected_calendar_name: Option<String>,
    pub sync_enabled: bool,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub include_source_links: bool,
    #[serde(skip)]
    pub authenticating: Option<ProviderKind>,
}

impl ConnectionState {
    /// Whether sync calls should reach a provider at all.
    pub fn is_enabled(&self) -> bool {
        self.sync_enabled && self.provider != ProviderKind::None
    }

    pub fn status(&self) -> ConnectionStatus {
        if let Some(provider) = self.authenticating {
            return ConnectionStatus::Authenticating(provider);
        }
        match self.provider {
            ProviderKind::None => ConnectionStatus::Disconnected,
            provider => ConnectionStatus::Connected(provider),
        }
    }

    /// Point the connection at `provider`'s calendar and enable sync.
    ///
    /// `last_sync_at` and `include_source_links` are preserved.
    pub fn connect(
        &mut self,
        provider: ProviderKind,
        calendar_id: impl Into<String>,
        calendar_name: impl Into<String>,
    ) {
        self.provider = provider;
        self.selected_calendar_id = Some(calendar_id.into());
        self.selected_calendar_name = Some(calendar_name.into());
        self.sync_enabled = true;
        self.authenticating = None;
    }
}
