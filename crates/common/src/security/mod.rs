//! Secret storage primitives
//!
//! - **`traits`**: the [`SecretStore`] capability and its error type
//! - **`keychain`** (feature `platform`): OS keychain implementation

#[cfg(feature = "platform")]
pub mod keychain;
pub mod traits;

#[cfg(feature = "platform")]
pub use keychain::KeychainProvider;
pub use traits::{KeychainError, SecretStore};
