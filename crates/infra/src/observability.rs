//! Tracing subscriber initialisation
//!
//! Filter comes from `RUST_LOG` when set, otherwise from the caller's
//! default directive. Installing twice is harmless; the second call reports
//! that a subscriber already exists.

use calsync_domain::{CalSyncError, Result};
use tracing_subscriber::EnvFilter;

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Install the global fmt subscriber.
///
/// # Errors
/// Returns `CalSyncError::Config` if `default_filter` is not a valid
/// directive, or `CalSyncError::Internal` if a global subscriber is already
/// installed.
pub fn init_tracing(default_filter: &str, format: LogFormat) -> Result<()> {
    let filter = build_filter(default_filter)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|e| CalSyncError::Internal(format!("Tracing already initialised: {e}")))
}

fn build_filter(default_filter: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_filter).map_err(|e| {
            CalSyncError::Config(format!("Invalid log filter '{default_filter}': {e}"))
        }),
    }
}
