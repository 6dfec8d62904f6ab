//! # CalSync Domain
//!
//! Business domain types for the calendar sync engine.
//!
//! This crate contains:
//! - The local `Event` record and its provider identity fields
//! - Connection state shared with UI observers
//! - Error taxonomy and Result definitions
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other CalSync crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
