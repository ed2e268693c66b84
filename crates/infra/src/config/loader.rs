//! Forwarding settings loader
//!
//! Loads [`ForwardingOptions`] from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `CROSSPOST_PORTALS`: Portal registry as a JSON object keyed by
//!   product key
//! - `CROSSPOST_ENABLED`: Whether forwarding is enabled (true/false)
//! - `CROSSPOST_POST_STATUS`: Status for created items (`publish` or
//!   `draft`)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./crosspost.json` or `./crosspost.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};

use crosspost_domain::{
    CrosspostError, ForwardingOptions, PortalRegistry, PostStatus, Result,
};

/// Load the forwarding settings with automatic fallback strategy
///
/// First attempts to load from environment variables. If the portal
/// registry variable is missing, falls back to loading from a config
/// file.
///
/// # Errors
/// Returns `CrosspostError::Config` if:
/// - Settings cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<ForwardingOptions> {
    // Try loading from environment first
    match load_from_env() {
        Ok(options) => {
            tracing::info!("Forwarding settings loaded from environment variables");
            Ok(options)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            // Fall back to file
            load_from_file(None)
        }
    }
}

/// Load the forwarding settings from environment variables
///
/// `CROSSPOST_PORTALS` must be present; the other variables fall back
/// to their defaults (forwarding disabled, items created as drafts).
///
/// # Errors
/// Returns `CrosspostError::Config` if the portal registry variable is
/// missing or any variable has an invalid value.
pub fn load_from_env() -> Result<ForwardingOptions> {
    let portals_raw = env_var("CROSSPOST_PORTALS")?;
    let portals: PortalRegistry = serde_json::from_str(&portals_raw)
        .map_err(|e| CrosspostError::Config(format!("Invalid portal registry JSON: {}", e)))?;

    // Disabled unless explicitly switched on, same as file loading.
    let enabled = env_bool("CROSSPOST_ENABLED", false);
    let post_status = match std::env::var("CROSSPOST_POST_STATUS") {
        Ok(raw) => parse_post_status(&raw)?,
        Err(_) => PostStatus::default(),
    };

    Ok(ForwardingOptions { enabled, post_status, portals })
}

/// Load the forwarding settings from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `CrosspostError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<ForwardingOptions> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CrosspostError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CrosspostError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading forwarding settings from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CrosspostError::Config(format!("Failed to read config file: {}", e)))?;

    parse_options(&contents, &config_path)
}

/// Parse forwarding settings from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `CrosspostError::Config` if format is invalid or parsing
/// fails.
fn parse_options(contents: &str, path: &Path) -> Result<ForwardingOptions> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CrosspostError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CrosspostError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(CrosspostError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches for config files in the following locations (in order):
/// 1. Current working directory (`./config.{json,toml}`,
///    `./crosspost.{json,toml}`)
/// 2. Parent directories (up to 2 levels)
/// 3. Relative to executable location
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    // Try current working directory
    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("crosspost.json"),
            cwd.join("crosspost.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
            cwd.join("../../config.json"),
            cwd.join("../../config.toml"),
        ]);
    }

    // Try relative to executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("crosspost.json"),
                exe_dir.join("crosspost.toml"),
                exe_dir.join("../config.json"),
                exe_dir.join("../config.toml"),
            ]);
        }
    }

    // Return first existing candidate
    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `CrosspostError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        CrosspostError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off`
/// (case-insensitive). Returns `default` if the variable is not set.
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

fn parse_post_status(raw: &str) -> Result<PostStatus> {
    match raw.to_ascii_lowercase().as_str() {
        "publish" => Ok(PostStatus::Publish),
        "draft" => Ok(PostStatus::Draft),
        other => Err(CrosspostError::Config(format!("Invalid post status: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const PORTALS_JSON: &str = r#"{
        "abc": {
            "name": "Portal A",
            "url": "https://a.example.com/",
            "user": "1728",
            "password": "xxxx-xxxx"
        }
    }"#;

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("TEST_CROSSPOST_BOOL_ONE", "1");
        std::env::set_var("TEST_CROSSPOST_BOOL_YES", "YES");
        std::env::set_var("TEST_CROSSPOST_BOOL_OFF", "off");

        assert!(env_bool("TEST_CROSSPOST_BOOL_ONE", false));
        assert!(env_bool("TEST_CROSSPOST_BOOL_YES", false));
        assert!(!env_bool("TEST_CROSSPOST_BOOL_OFF", true));

        std::env::remove_var("TEST_CROSSPOST_BOOL_MISSING");
        assert!(env_bool("TEST_CROSSPOST_BOOL_MISSING", true));
        assert!(!env_bool("TEST_CROSSPOST_BOOL_MISSING", false));

        std::env::remove_var("TEST_CROSSPOST_BOOL_ONE");
        std::env::remove_var("TEST_CROSSPOST_BOOL_YES");
        std::env::remove_var("TEST_CROSSPOST_BOOL_OFF");
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("CROSSPOST_PORTALS", PORTALS_JSON);
        std::env::set_var("CROSSPOST_ENABLED", "true");
        std::env::set_var("CROSSPOST_POST_STATUS", "publish");

        let result = load_from_env();
        assert!(result.is_ok(), "Should load settings from env vars, error: {:?}", result.err());

        let options = result.unwrap();
        assert!(options.enabled);
        assert_eq!(options.post_status, PostStatus::Publish);
        let portal = options.portal("abc").expect("portal abc");
        assert_eq!(portal.name, "Portal A");
        assert_eq!(portal.user, "1728");

        std::env::remove_var("CROSSPOST_PORTALS");
        std::env::remove_var("CROSSPOST_ENABLED");
        std::env::remove_var("CROSSPOST_POST_STATUS");
    }

    #[test]
    fn test_load_from_env_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("CROSSPOST_PORTALS", "{}");
        std::env::remove_var("CROSSPOST_ENABLED");
        std::env::remove_var("CROSSPOST_POST_STATUS");

        let options = load_from_env().expect("settings with defaults");
        assert!(!options.enabled, "forwarding should be off unless explicitly enabled");
        assert_eq!(options.post_status, PostStatus::Draft);
        assert!(options.portals.is_empty());

        std::env::remove_var("CROSSPOST_PORTALS");
    }

    #[test]
    fn test_load_from_env_missing_registry() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::remove_var("CROSSPOST_PORTALS");

        let result = load_from_env();
        assert!(result.is_err(), "Should fail with missing env var");

        let err = result.unwrap_err();
        assert!(matches!(err, CrosspostError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_load_from_env_invalid_status() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("CROSSPOST_PORTALS", "{}");
        std::env::set_var("CROSSPOST_POST_STATUS", "pending");

        let result = load_from_env();
        assert!(result.is_err(), "Should fail with invalid post status");

        std::env::remove_var("CROSSPOST_PORTALS");
        std::env::remove_var("CROSSPOST_POST_STATUS");
    }

    #[test]
    fn test_load_from_file_json() {
        let json_content = r#"{
            "enabled": true,
            "post_status": "publish",
            "portals": {
                "abc": {
                    "name": "Portal A",
                    "url": "https://a.example.com/",
                    "user": "1728",
                    "password": "xxxx-xxxx"
                }
            }
        }"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(json_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let result = load_from_file(Some(path.clone()));
        assert!(result.is_ok(), "Should load settings from JSON file");

        let options = result.unwrap();
        assert!(options.enabled);
        assert_eq!(options.post_status, PostStatus::Publish);
        assert!(options.portal("abc").is_some());

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_toml() {
        let toml_content = r#"
enabled = false
post_status = "draft"

[portals.xyz]
name = "Portal B"
url = "https://b.example.com/"
user = "2201"
password = "yyyy-yyyy"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("toml");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let result = load_from_file(Some(path.clone()));
        assert!(result.is_ok(), "Should load settings from TOML file");

        let options = result.unwrap();
        assert!(!options.enabled);
        assert_eq!(options.portal("xyz").expect("portal xyz").name, "Portal B");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/config.json")));
        assert!(result.is_err(), "Should fail when file not found");

        let err = result.unwrap_err();
        assert!(matches!(err, CrosspostError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let invalid_json = r#"{ "this is": "not valid json" "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(invalid_json.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let result = load_from_file(Some(path.clone()));
        assert!(result.is_err(), "Should fail with invalid JSON");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_options_unsupported_format() {
        let content = "some content";
        let path = PathBuf::from("test.yaml");
        let result = parse_options(content, &path);
        assert!(result.is_err(), "Should fail with unsupported format");
    }
}
