//! Remote REST calendar provider (OAuth2 + PKCE)
//!
//! - [`session`]: interactive browser consent over a loopback listener
//! - [`oauth`]: authorization URL, callback validation, code exchange
//! - [`types`]: REST wire types
//! - [`provider`]: the [`CalendarProvider`](calsync_core::CalendarProvider)
//!   implementation

pub mod oauth;
pub mod provider;
pub mod session;
pub mod types;

pub use provider::RemoteCalendarProvider;
pub use session::{
    AuthorizationSession, CancelHandle, LoopbackAuthorizationSession, SessionOutcome,
};
