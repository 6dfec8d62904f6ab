//! Provider-returned calendar descriptions

use serde::{Deserialize, Serialize};

use super::connection::ProviderKind;

/// A calendar collection offered by a provider for the picker.
///
/// Transient: never cached beyond a picker session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarInfo {
    pub id: String,
    pub title: String,
    /// Human-readable grouping, e.g. the account name.
    pub source: String,
    pub color: Option<String>,
    pub provider: ProviderKind,
    pub allows_modification: bool,
}

/// Result of a provider update.
///
/// Providers that self-heal a vanished event report the id of the event they
/// created in its place so the caller can relink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    Recreated(String),
}
