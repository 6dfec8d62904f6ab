//! File-backed [`ConnectionStore`]

use std::path::PathBuf;

use async_trait::async_trait;
use calsync_core::ConnectionStore;
use calsync_domain::{ConnectionState, Result};
use tracing::debug;

use super::json_file::{read_json, remove_file, write_json_atomic};

/// Persists the connection state as a single JSON document.
pub struct FileConnectionStore {
    path: PathBuf,
}

impl FileConnectionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl ConnectionStore for FileConnectionStore {
    async fn load(&self) -> Result<Option<ConnectionState>> {
        read_json(&self.path).await
    }

    async fn save(&self, state: &ConnectionState) -> Result<()> {
        debug!(
            path = %self.path.display(),
            provider = %state.provider,
            "Persisting connection state"
        );
        write_json_atomic(&self.path, state).await
    }

    async fn clear(&self) -> Result<()> {
        debug!(path = %self.path.display(), "Clearing connection state");
        remove_file(&self.path).await
    }
}
