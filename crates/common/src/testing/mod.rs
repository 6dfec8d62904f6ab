//! Test doubles shared across the workspace

pub mod mocks;

pub use mocks::MemorySecretStore;
