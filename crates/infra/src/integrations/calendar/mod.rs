//! Calendar provider clients
//!
//! - [`local`]: device calendar store behind an OS permission gate
//! - [`remote`]: REST calendar service authorized with OAuth2 + PKCE
//!
//! Both implement [`CalendarProvider`](calsync_core::CalendarProvider); the
//! sync engine picks one based on the connection's provider.

pub mod local;
pub mod remote;

pub use local::{JsonDeviceCalendar, LocalCalendarProvider, PermissionStatus};
pub use remote::{LoopbackAuthorizationSession, RemoteCalendarProvider};
