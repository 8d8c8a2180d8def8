use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Name of the dot-directory created under `$HOME`
pub const DEFAULT_CONFIG_DIR_NAME: &str = ".soq";
/// Name of the optional config file inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("error getting user home directory: HOME is not set")]
    NoHomeDir,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Get the user's home directory
pub fn home_dir() -> Result<PathBuf, ConfigError> {
    match std::env::var_os("HOME") {
        Some(home) if !home.is_empty() => Ok(PathBuf::from(home)),
        _ => Err(ConfigError::NoHomeDir),
    }
}

/// `$HOME/.soq`
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    Ok(home_dir()?.join(DEFAULT_CONFIG_DIR_NAME))
}

/// Read `config.toml` from the config directory. A missing file yields the defaults.
pub fn read_config(config_dir: &Path) -> Result<Config, ConfigError> {
    let config_path = config_dir.join(CONFIG_FILE);
    let config_text = match fs::read_to_string(&config_path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: config_path,
                source: e,
            });
        }
    };
    toml::from_str(&config_text).map_err(|e| ConfigError::ParseError {
        path: config_path,
        source: e,
    })
}
