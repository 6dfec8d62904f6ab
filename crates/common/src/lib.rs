//! Shared building blocks for CalSync crates.
//!
//! # Modules
//!
//! - `auth`: PKCE helpers and provider-scoped OAuth token persistence
//! - `security`: the [`SecretStore`](security::SecretStore) capability and
//!   its OS keychain implementation (feature `platform`)
//! - `testing`: in-memory doubles (feature `test-utils`)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;
pub mod security;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use auth::{OAuthCredential, PKCEChallenge, TokenResponse};
pub use security::{KeychainError, SecretStore};
