//! Configuration loader
//!
//! Loads portal configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `EYECARE_API_BASE_URL` is unset, falls back to loading from file
//! 3. If no file exists either, uses the built-in defaults
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `EYECARE_API_BASE_URL`: Backend base URL (required for env mode)
//! - `EYECARE_API_TIMEOUT_MS`: Per-request timeout in milliseconds
//! - `EYECARE_RETRY_MAX_ATTEMPTS`: Attempts per read, including the first
//! - `EYECARE_RETRY_BASE_DELAY_MS`: Backoff base delay in milliseconds
//! - `EYECARE_STORE_PATH`: SQLite session store path
//! - `EYECARE_LOG_LEVEL`: Default log level
//! - `EYECARE_LOG_JSON`: Emit JSON logs (true/false)
//!
//! ## File Locations
//! The loader searches the following paths (in order):
//! 1. `./eyecare.toml`, `./eyecare.json`, `./config.toml`, `./config.json`
//!    (current working directory)
//! 2. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use eyecare_domain::{EyeCareError, PortalConfig, Result};
use url::Url;

const CONFIG_FILE_NAMES: [&str; 4] = ["eyecare.toml", "eyecare.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables, then from a config
/// file, and finally falls back to defaults. The result is validated.
///
/// # Errors
/// Returns `EyeCareError::Config` if a source is present but invalid, or
/// the resulting configuration fails [`validate`].
pub fn load() -> Result<PortalConfig> {
    let config = match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(e) if std::env::var_os("EYECARE_API_BASE_URL").is_some() => return Err(e),
        Err(e) => {
            tracing::debug!(error = ?e, "Environment not configured, trying file");
            match find_config_file() {
                Some(path) => load_from_file(Some(path))?,
                None => {
                    tracing::info!("No config file found, using defaults");
                    PortalConfig::default()
                }
            }
        }
    };

    validate(&config)?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// `EYECARE_API_BASE_URL` must be present; every other variable is optional
/// and defaults when unset.
///
/// # Errors
/// Returns `EyeCareError::Config` if the base URL is missing or a variable
/// has an invalid value.
pub fn load_from_env() -> Result<PortalConfig> {
    let mut config = PortalConfig::default();
    config.api.base_url = env_var("EYECARE_API_BASE_URL")?;

    if let Some(timeout_ms) = env_parse("EYECARE_API_TIMEOUT_MS")? {
        config.api.timeout_ms = timeout_ms;
    }
    if let Some(attempts) = env_parse("EYECARE_RETRY_MAX_ATTEMPTS")? {
        config.retry.max_attempts = attempts;
    }
    if let Some(delay_ms) = env_parse("EYECARE_RETRY_BASE_DELAY_MS")? {
        config.retry.base_delay_ms = delay_ms;
    }
    if let Ok(path) = std::env::var("EYECARE_STORE_PATH") {
        config.storage.path = Some(path).filter(|p| !p.is_empty());
    }
    if let Ok(level) = std::env::var("EYECARE_LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("EYECARE_LOG_JSON", config.logging.json);

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, searches the standard locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
/// Sections and fields missing from the file keep their defaults.
///
/// # Errors
/// Returns `EyeCareError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<PortalConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(EyeCareError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => find_config_file().ok_or_else(|| {
            EyeCareError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| EyeCareError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Check that a configuration can drive the client
///
/// # Errors
/// Returns `EyeCareError::Config` unless the base URL is an absolute http(s)
/// URL and at least one attempt is allowed.
pub fn validate(config: &PortalConfig) -> Result<()> {
    let url = Url::parse(&config.api.base_url).map_err(|e| {
        EyeCareError::Config(format!("Invalid API base URL {}: {}", config.api.base_url, e))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(EyeCareError::Config(format!(
            "API base URL must use http or https, got {}",
            url.scheme()
        )));
    }
    if config.retry.max_attempts == 0 {
        return Err(EyeCareError::Config("retry.max_attempts must be at least 1".into()));
    }
    Ok(())
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<PortalConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| EyeCareError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| EyeCareError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(EyeCareError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Search the standard paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn find_config_file() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        EyeCareError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse an optional environment variable
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| EyeCareError::Config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
