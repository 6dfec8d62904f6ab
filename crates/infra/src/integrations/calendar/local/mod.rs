//! Local (device) calendar provider
//!
//! - **`device`**: the [`DeviceCalendar`] capability and permission model
//! - **`json_store`**: [`JsonDeviceCalendar`], a file-backed device calendar
//! - **`provider`**: [`LocalCalendarProvider`], the engine-facing client

pub mod device;
pub mod json_store;
pub mod provider;

pub use device::{DeviceCalendar, DeviceCalendarInfo, DeviceEventRecord, PermissionStatus};
pub use json_store::JsonDeviceCalendar;
pub use provider::LocalCalendarProvider;
