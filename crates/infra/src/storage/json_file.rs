//! Small JSON file helpers shared by the file-backed stores.

use std::path::Path;

use calsync_domain::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::InfraError;

/// Read and parse `path`. A missing file is `Ok(None)`.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(InfraError::from(err).into()),
    };
    let value = serde_json::from_slice(&bytes).map_err(InfraError::from)?;
    Ok(Some(value))
}

/// Write `value` to a sibling temp file, then rename it over `path`.
pub async fn write_json_atomic<T: Serialize + Sync>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(InfraError::from)?;
    }

    let content = serde_json::to_vec_pretty(value).map_err(InfraError::from)?;
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");

    tokio::fs::write(&temp, content).await.map_err(InfraError::from)?;
    tokio::fs::rename(&temp, path).await.map_err(InfraError::from)?;
    Ok(())
}

/// Delete `path`; a missing file is fine.
pub async fn remove_file(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(InfraError::from(err).into()),
    }
}

#[cfg(test)]
mod tests {
    use calsync_domain::CalSyncError;
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn write_then_read_in_nested_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/state.json");

        write_json_atomic(&path, &vec![1, 2, 3]).await.unwrap();
        let loaded: Option<Vec<i32>> = read_json(&path).await.unwrap();

        assert_eq!(loaded, Some(vec![1, 2, 3]));
        assert!(!dir.path().join("nested/state.json.tmp").exists());
    }

    #[tokio::test]
    async fn missing_file_reads_as_none_and_removes_cleanly() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");

        let loaded: Option<Vec<i32>> = read_json(&path).await.unwrap();
        assert!(loaded.is_none());
        remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_file_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = read_json::<Vec<i32>>(&path).await.unwrap_err();
        assert!(matches!(err, CalSyncError::Storage(_)));
    }
}
