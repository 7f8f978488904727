//! Configuration loading and server URL resolution

use crate::api::DurationConstants;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Backend address used when nothing else is configured
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Per-request timeout applied when the config does not set one
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Environment variable overriding the server URL
pub const SERVER_URL_ENV: &str = "TTGEN_SERVER_URL";

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub server_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    /// Deadline for a whole bulk upload; none means wait indefinitely
    pub batch_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
    pub durations: Option<DurationConstants>,
}

impl TomlConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn batch_timeout(&self) -> Option<Duration> {
        self.batch_timeout_secs.map(Duration::from_secs)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    pub fn durations(&self) -> DurationConstants {
        self.durations.unwrap_or_default()
    }
}

/// Parse a config file
///
/// # Errors
/// [`Error::Io`] if the file cannot be read, [`Error::Config`] if it is not
/// valid TOML for [`TomlConfig`].
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

/// Load configuration, tolerating a missing file
///
/// An explicit path must exist. Without one, the platform config file is used
/// if present; otherwise defaults apply and a warning is logged.
pub fn load_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        return load_toml_config(path);
    }

    match default_config_path() {
        Ok(path) => {
            debug!(path = %path.display(), "Loading config file");
            load_toml_config(&path)
        }
        Err(e) => {
            warn!("{} - using defaults", e);
            Ok(TomlConfig::default())
        }
    }
}

/// Server URL resolution in priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. Compiled default (fallback)
///
/// Trailing slashes are removed so endpoint paths can be appended directly.
pub fn resolve_server_url(
    cli_arg: Option<&str>,
    env_var_name: &str,
    config: &TomlConfig,
) -> String {
    let url = cli_arg
        .map(str::to_string)
        .or_else(|| std::env::var(env_var_name).ok().filter(|v| !v.is_empty()))
        .or_else(|| config.server_url.clone())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
    url.trim_end_matches('/').to_string()
}

/// Locate the platform configuration file
fn default_config_path() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("ttgen").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(unix) {
        let system_config = PathBuf::from("/etc/ttgen/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}
