//! Configuration file loading.
//!
//! The file is TOML, or JSON when its extension is `.json`. Every section
//! is optional. Loading never fails: an unreadable or malformed file is
//! logged and replaced by defaults, invalid values are repaired, and
//! credentials missing from the file are taken from the environment.

use std::path::{Path, PathBuf};

use websearch_router::RouterConfig;

use crate::error::{AppError, Result};

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "WEBSEARCH_CONFIG_DIR";

/// Application config directory.
///
/// Resolves to `dirs::config_dir()/websearch/` by default. Override with
/// the `WEBSEARCH_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("websearch"))
        .unwrap_or_else(|| PathBuf::from("/tmp/websearch-config"))
}

/// Returns the default config file path: `<config_dir>/config.toml`.
#[must_use]
pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Parse a configuration file, choosing the format by extension.
///
/// # Errors
///
/// Returns [`AppError::Io`] if the file cannot be read and
/// [`AppError::Config`] if it cannot be parsed.
pub fn from_file(path: &Path) -> Result<RouterConfig> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&content).map_err(|e| AppError::Config(e.to_string()))
    } else {
        toml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))
    }
}

/// Load the configuration for a run, reading credentials from the process
/// environment.
///
/// `path` is the file given on the command line, if any; otherwise the
/// default path is used, and a missing default file is not worth a warning.
pub fn load(path: Option<&Path>) -> RouterConfig {
    load_with(path, |var| std::env::var(var).ok())
}

/// [`load`] with an explicit environment lookup.
pub fn load_with<F>(path: Option<&Path>, lookup: F) -> RouterConfig
where
    F: Fn(&str) -> Option<String>,
{
    let explicit = path.is_some();
    let path = path.map_or_else(default_config_path, Path::to_path_buf);

    let config = match from_file(&path) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            config
        }
        Err(AppError::Io(e)) if !explicit && e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            RouterConfig::default()
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring config file, using defaults");
            RouterConfig::default()
        }
    };

    config.merge_env_credentials(lookup).sanitized()
}
