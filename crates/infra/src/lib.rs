//! # CalSync Infrastructure
//!
//! Adapters for the ports defined in `calsync-core`.
//!
//! This crate contains:
//! - Calendar provider clients (device calendar, remote REST + OAuth2)
//! - File-backed connection state persistence
//! - Configuration loading and tracing setup
//! - Conversions from transport errors into the domain taxonomy
//!
//! ## Architecture
//! - Implements traits defined in `calsync-core`
//! - Depends on `calsync-common` and `calsync-core`
//! - Contains all "impure" code (HTTP, filesystem, keychain, browser)

pub mod config;
pub mod context;
pub mod errors;
pub mod integrations;
pub mod observability;
pub mod storage;

pub use context::CalendarContext;
pub use errors::InfraError;
pub use integrations::calendar;
pub use observability::{init_tracing, LogFormat};
pub use storage::FileConnectionStore;
