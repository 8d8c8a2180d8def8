use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from `<config-dir>/config.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the soq service
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Per-request timeout, clamped to 1..=10 seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    /// Request timeout with the configured value clamped into range
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs.clamp(1, 10))
    }
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout_secs() -> u64 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Theme color overrides, e.g. `highlight = "#FB4196"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}
