//! OAuth 2.0 + PKCE building blocks
//!
//! # Module Organization
//!
//! - **[`pkce`]**: verifier/challenge/state generation (RFC 7636)
//! - **[`types`]**: token endpoint response and stored credential types
//! - **[`credentials`]**: provider-scoped token persistence over a
//!   [`SecretStore`](crate::security::SecretStore)
//!
//! The HTTP side of the flow (authorization URL, callback, code exchange)
//! lives with the remote provider client in `calsync-infra`.

pub mod credentials;
pub mod pkce;
pub mod types;

pub use credentials::{clear_credential, load_access_token, load_credential, store_credential};
pub use pkce::{generate_code_challenge, generate_code_verifier, generate_state, PKCEChallenge};
pub use types::{OAuthCredential, TokenResponse};
