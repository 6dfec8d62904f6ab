//! File-backed persistence
//!
//! - **`connection_store`**: [`FileConnectionStore`] for the connection state
//! - **`json_file`**: atomic JSON read/write helpers

pub mod connection_store;
pub mod json_file;

pub use connection_store::FileConnectionStore;
