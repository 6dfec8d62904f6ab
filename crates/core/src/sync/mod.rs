//! Sync orchestration
//!
//! - **`ports`**: event and connection store interfaces
//! - **`connection`**: the single-writer connection state holder
//! - **`engine`**: [`SyncEngine`](engine::SyncEngine)

pub mod connection;
pub mod engine;
pub mod ports;
