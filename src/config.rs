//! Configuration loading for Hava Durumu
//!
//! Settings are layered: built-in defaults, then `config.toml` from the XDG
//! config directory (or an explicit `--config` file), then environment
//! variables such as `HAVADURUMU__WEATHER__API_KEY`. Command-line flags are
//! applied on top by the caller.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

use crate::data::weather::OPEN_WEATHER_BASE_URL;

/// Prefix for environment variable overrides
const ENV_PREFIX: &str = "HAVADURUMU";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or did not match the expected shape
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Weather service settings
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    #[serde(default)]
    pub api_key: Option<String>,
    /// API root URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Language for condition descriptions
    #[serde(default = "default_language")]
    pub language: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Screen and search behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// City shown on startup when none is given on the command line
    #[serde(default = "default_city")]
    pub default_city: String,
    /// Quiet period before a typed query is searched
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    /// Shortest query that triggers a search
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
    /// Maximum suggestions shown under the search bar
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
}

/// Log output settings
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive such as "info" or "havadurumu=debug"
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file path; defaults to the XDG cache directory
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_base_url() -> String {
    OPEN_WEATHER_BASE_URL.to_string()
}

fn default_language() -> String {
    "tr".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_city() -> String {
    "Istanbul".to_string()
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_min_query_len() -> usize {
    2
}

fn default_suggestion_limit() -> usize {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            language: default_language(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_city: default_city(),
            search_debounce_ms: default_search_debounce_ms(),
            min_query_len: default_min_query_len(),
            suggestion_limit: default_suggestion_limit(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Project directories used for config and log files
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "havadurumu")
}

/// Default location of the config file, if a home directory exists
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

impl AppConfig {
    /// Loads configuration from all sources.
    ///
    /// # Arguments
    /// * `explicit_path` - A config file that must exist; when `None`, the
    ///   XDG config file is used if present
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        match explicit_path {
            Some(path) => {
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                if let Some(path) = default_config_path() {
                    builder = builder.add_source(File::from(path).required(false));
                }
            }
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Applies an API key given on the command line or via `OPENWEATHER_API_KEY`
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key {
            self.weather.api_key = Some(key);
        }
        self
    }
}
