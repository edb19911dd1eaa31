//! Configuration file loading and parsing.
//!
//! This module handles loading the configuration file from disk and parsing
//! it into validated, type-safe structures.
//!
//! # Configuration File Locations
//!
//! 1. Path given as the `CONFIG_FILE` CLI argument (must exist)
//! 2. Default location, used only if present:
//!    - **Linux/macOS:** `~/.design-system-mcp/config.json`
//!    - **Windows:** `%USERPROFILE%\.design-system-mcp\config.json`
//!
//! Without either file the built-in defaults apply.
//!
//! # Example Configuration
//!
//! See `config/example-config.json` for a complete example.

mod settings;

pub use settings::{Config, LoggingConfig, DEFAULT_LIBRARY_NAME, LOG_LEVELS};

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};

/// Design-system directory used when neither the CLI nor the config sets one.
pub const DEFAULT_DESIGN_SYSTEM_PATH: &str = "./src";

/// Returns the default configuration directory.
///
/// - **Linux/macOS:** `~/.design-system-mcp/`
/// - **Windows:** `%USERPROFILE%\.design-system-mcp\`
#[must_use]
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".design-system-mcp"))
}

/// Returns the platform-specific default configuration file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|p| p.join("config.json"))
}

/// Loads and validates the configuration.
///
/// An explicit `path` must exist. With `path` set to `None` the default
/// location is read if present; otherwise [`Config::default`] is returned.
///
/// # Errors
///
/// Returns an error if:
/// - An explicit configuration file does not exist
/// - The file cannot be read
/// - The JSON is malformed or has unknown fields
/// - Validation fails
pub fn load_config(path: Option<&Path>) -> ConfigResult<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::NotFound {
                    path: p.to_path_buf(),
                });
            }
            p.to_path_buf()
        }
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => {
                tracing::debug!("No configuration file, using defaults");
                return Ok(Config::default());
            }
        },
    };

    load_from(&config_path)
}

fn load_from(config_path: &Path) -> ConfigResult<Config> {
    let contents = std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
        path: config_path.to_path_buf(),
        source: e,
    })?;

    let config: Config = serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: config_path.to_path_buf(),
        source: e,
    })?;

    config.validate()?;

    Ok(config)
}

/// Picks the design-system directory: CLI override, then config, then
/// [`DEFAULT_DESIGN_SYSTEM_PATH`].
#[must_use]
pub fn design_system_path(cli: Option<&Path>, config: &Config) -> PathBuf {
    cli.map(Path::to_path_buf)
        .or_else(|| config.design_system_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DESIGN_SYSTEM_PATH))
}
