//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the required ones are missing, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `CALSYNC_REMOTE_CLIENT_ID` (required): OAuth client id
//! - `CALSYNC_REMOTE_REDIRECT_URI`: loopback redirect URI
//! - `CALSYNC_REMOTE_AUTHORIZATION_ENDPOINT`: OAuth `/authorize` endpoint
//! - `CALSYNC_REMOTE_TOKEN_ENDPOINT`: OAuth `/token` endpoint
//! - `CALSYNC_REMOTE_API_BASE_URL`: calendar REST API base URL
//! - `CALSYNC_REMOTE_SCOPES`: space-separated OAuth scopes
//! - `CALSYNC_REMOTE_AUTH_TIMEOUT`: browser session timeout in seconds
//! - `CALSYNC_REMOTE_REQUEST_TIMEOUT`: HTTP request timeout in seconds
//! - `CALSYNC_LOCAL_STORE_PATH`: device calendar file
//! - `CALSYNC_STATE_PATH`: connection state file
//! - `CALSYNC_TIME_ZONE`: IANA zone for timed events
//!
//! Unset optional variables keep their defaults.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./calsync.{json,toml}` then `./config.{json,toml}` (current working
//!    directory)
//! 2. The same names in the parent and grandparent directories
//! 3. Relative to executable location

use std::path::{Path, PathBuf};
use std::time::Duration;

use calsync_domain::{CalSyncError, Config, Result};

const CONFIG_FILE_NAMES: [&str; 4] = ["calsync.json", "calsync.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `CalSyncError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The configured time zone is unknown
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `CalSyncError::Config` if `CALSYNC_REMOTE_CLIENT_ID` is missing
/// or a value is invalid.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.remote.client_id = env_var("CALSYNC_REMOTE_CLIENT_ID")?;
    if let Some(uri) = env_opt("CALSYNC_REMOTE_REDIRECT_URI") {
        config.remote.redirect_uri = uri;
    }
    if let Some(endpoint) = env_opt("CALSYNC_REMOTE_AUTHORIZATION_ENDPOINT") {
        config.remote.authorization_endpoint = endpoint;
    }
    if let Some(endpoint) = env_opt("CALSYNC_REMOTE_TOKEN_ENDPOINT") {
        config.remote.token_endpoint = endpoint;
    }
    if let Some(base) = env_opt("CALSYNC_REMOTE_API_BASE_URL") {
        config.remote.api_base_url = base;
    }
    if let Some(scopes) = env_opt("CALSYNC_REMOTE_SCOPES") {
        config.remote.scopes = scopes.split_whitespace().map(str::to_string).collect();
    }
    if let Some(timeout) = env_secs("CALSYNC_REMOTE_AUTH_TIMEOUT")? {
        config.remote.auth_timeout_seconds = timeout.as_secs();
    }
    if let Some(timeout) = env_secs("CALSYNC_REMOTE_REQUEST_TIMEOUT")? {
        config.remote.request_timeout_seconds = timeout.as_secs();
    }
    if let Some(path) = env_opt("CALSYNC_LOCAL_STORE_PATH") {
        config.local.store_path = path;
    }
    if let Some(path) = env_opt("CALSYNC_STATE_PATH") {
        config.sync.state_path = path;
    }
    if let Some(zone) = env_opt("CALSYNC_TIME_ZONE") {
        config.sync.time_zone = zone;
    }

    validate(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `CalSyncError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CalSyncError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CalSyncError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CalSyncError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path).and_then(validate)
}

/// Parse configuration from string content, format by file extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CalSyncError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CalSyncError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(CalSyncError::Config(format!("Unsupported config format: {extension}"))),
    }
}

fn validate(config: Config) -> Result<Config> {
    config.sync.tz()?;
    url::Url::parse(&config.remote.redirect_uri)
        .map_err(|e| CalSyncError::Config(format!("Invalid redirect URI: {e}")))?;
    Ok(config)
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    ["", "..", "../.."]
        .iter()
        .flat_map(|up| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(up).join(name)))
        .collect()
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| CalSyncError::Config(format!("Missing required environment variable: {key}")))
}

/// Optional, non-empty environment variable
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_secs(key: &str) -> Result<Option<Duration>> {
    env_opt(key)
        .map(|raw| {
            raw.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| CalSyncError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use calsync_domain::constants::{DEFAULT_API_BASE_URL, DEFAULT_REDIRECT_URI};
    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ENV_KEYS: [&str; 6] = [
        "CALSYNC_REMOTE_CLIENT_ID",
        "CALSYNC_REMOTE_REDIRECT_URI",
        "CALSYNC_REMOTE_API_BASE_URL",
        "CALSYNC_REMOTE_AUTH_TIMEOUT",
        "CALSYNC_STATE_PATH",
        "CALSYNC_TIME_ZONE",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    fn write_config(contents: &str, extension: &str) -> (NamedTempFile, PathBuf) {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).unwrap();
        (temp_file, path)
    }

    #[test]
    fn test_load_from_env_uses_defaults_for_optional_vars() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("CALSYNC_REMOTE_CLIENT_ID", "client-123");
        std::env::set_var("CALSYNC_STATE_PATH", "/tmp/state.json");
        std::env::set_var("CALSYNC_TIME_ZONE", "Europe/Berlin");

        let config = load_from_env().unwrap();

        assert_eq!(config.remote.client_id, "client-123");
        assert_eq!(config.remote.redirect_uri, DEFAULT_REDIRECT_URI);
        assert_eq!(config.remote.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.sync.state_path, "/tmp/state.json");
        assert_eq!(config.sync.time_zone, "Europe/Berlin");

        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_client_id() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, CalSyncError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_load_from_env_invalid_timeout() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("CALSYNC_REMOTE_CLIENT_ID", "client-123");
        std::env::set_var("CALSYNC_REMOTE_AUTH_TIMEOUT", "soon");

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, CalSyncError::Config(_)));

        clear_env();
    }

    #[test]
    fn test_load_from_env_rejects_unknown_time_zone() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("CALSYNC_REMOTE_CLIENT_ID", "client-123");
        std::env::set_var("CALSYNC_TIME_ZONE", "Mars/Olympus_Mons");

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, CalSyncError::Config(_)));

        clear_env();
    }

    #[test]
    fn test_load_from_file_json() {
        let (_temp, path) = write_config(
            r#"{
                "remote": { "client_id": "json-client", "scopes": ["a", "b"] },
                "sync": { "time_zone": "America/Chicago" }
            }"#,
            "json",
        );

        let config = load_from_file(Some(path.clone())).unwrap();
        assert_eq!(config.remote.client_id, "json-client");
        assert_eq!(config.remote.scope_string(), "a b");
        assert_eq!(config.sync.time_zone, "America/Chicago");
        assert_eq!(config.remote.redirect_uri, DEFAULT_REDIRECT_URI);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_toml() {
        let (_temp, path) = write_config(
            r#"
[remote]
client_id = "toml-client"
request_timeout_seconds = 5

[local]
store_path = "/tmp/device.json"
"#,
            "toml",
        );

        let config = load_from_file(Some(path.clone())).unwrap();
        assert_eq!(config.remote.client_id, "toml-client");
        assert_eq!(config.remote.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.local.store_path, "/tmp/device.json");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let err = load_from_file(Some(PathBuf::from("/nonexistent/calsync.json"))).unwrap_err();
        assert!(matches!(err, CalSyncError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let (_temp, path) = write_config(r#"{ "remote": "#, "json");

        assert!(load_from_file(Some(path.clone())).is_err());

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", &PathBuf::from("test.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }

    #[test]
    fn test_candidates_cover_parent_directories() {
        let candidates = candidates_in(Path::new("/work/app"));
        assert_eq!(candidates.len(), 12);
        assert_eq!(candidates[0], PathBuf::from("/work/app/calsync.json"));
        assert!(candidates.contains(&PathBuf::from("/work/app/../../config.toml")));
    }
}
