//! Application configuration.
//!
//! `AppConfig` carries the UI-wide defaults; `Config` adds the API base URL
//! every `ResourceService` is built against. Both load from YAML, and the
//! base URL can be overridden from the environment.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable overriding `Config::api_url`.
pub const API_URL_ENV: &str = "ADMIN_API_URL";

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Auto,
    Dark,
    Light,
}

/// UI-wide defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub layout: String,
    pub scheme: Scheme,
    pub theme: String,
    /// Common modules to enable
    pub common: Vec<String>,
    pub show_settings: bool,
    pub show_footer: bool,
    pub show_header: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            layout: "classic".to_string(),
            scheme: Scheme::Auto,
            theme: "default".to_string(),
            common: [
                "languages",
                "fullscreen",
                "messages",
                "notifications",
                "search",
                "shortcuts",
                "user",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            show_settings: true,
            show_footer: true,
            show_header: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub app: AppConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            app: AppConfig::default(),
        }
    }
}

impl Config {
    /// Load from a YAML file, then apply the environment override.
    ///
    /// Missing keys fall back to their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml_str(&contents)?;
        Ok(config.with_env_override(std::env::var(API_URL_ENV).ok()))
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Defaults plus the environment override.
    pub fn from_env() -> Self {
        Self::default().with_env_override(std::env::var(API_URL_ENV).ok())
    }

    /// Replace `api_url` with `value` when it is set and non-blank.
    pub fn with_env_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            tracing::debug!(api_url = %url, "api url overridden from environment");
            self.api_url = url;
        }
        self
    }
}
