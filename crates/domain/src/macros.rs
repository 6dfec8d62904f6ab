//! Macro for implementing Display and FromStr for tag-like enums
//!
//! Provider kinds are persisted and logged as short
//! lowercase strings. This macro keeps both directions of that mapping in a
//! single table.
//!
//! # Example
//!
//! ```rust
//! use calsync_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Backend {
//!     Device,
//!     Rest,
//! }
//!
//! impl_domain_status_conversions!(Backend {
//!     Device => "device",
//!     Rest => "rest",
//! });
//!
//! assert_eq!(Backend::Rest.to_string(), "rest");
//! assert_eq!("DEVICE".parse::<Backend>().unwrap(), Backend::Device);
//! ```

/// Implements Display and FromStr traits for tag-like enums
///
/// - Display: converts enum variants to their lowercase strings
/// - FromStr: parses case-insensitive strings to enum variants
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
