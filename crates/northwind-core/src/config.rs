use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "NORTHWIND_CONFIG_DIR";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding config.toml and the persisted state file
    #[serde(skip)]
    pub config_dir: PathBuf,

    /// Weather and geocoding API settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Device position settings
    #[serde(default)]
    pub geolocation: GeolocationConfig,

    /// Display preferences
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Open-Meteo forecast endpoint
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    /// Open-Meteo geocoding endpoint
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum number of places returned by a search
    #[serde(default = "default_search_count")]
    pub search_count: u32,

    #[serde(default = "default_language")]
    pub language: String,
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_search_count() -> u32 {
    5
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            forecast_url: default_forecast_url(),
            geocoding_url: default_geocoding_url(),
            request_timeout_secs: default_request_timeout_secs(),
            search_count: default_search_count(),
            language: default_language(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    #[serde(default = "default_enable_high_accuracy")]
    pub enable_high_accuracy: bool,

    /// How long a position request may take before giving up
    #[serde(default = "default_geolocation_timeout_ms")]
    pub timeout_ms: u64,

    /// Fixed device position. Geolocation is unsupported when unset.
    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,
}

fn default_enable_high_accuracy() -> bool {
    true
}

fn default_geolocation_timeout_ms() -> u64 {
    8000
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            enable_high_accuracy: default_enable_high_accuracy(),
            timeout_ms: default_geolocation_timeout_ms(),
            latitude: None,
            longitude: None,
        }
    }
}

impl GeolocationConfig {
    /// The fixed position, if both halves are configured.
    pub fn fixed_position(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Number of daily entries considered for forecast cards (today included)
    #[serde(default = "default_forecast_days")]
    pub forecast_days: usize,
}

fn default_forecast_days() -> usize {
    5
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            forecast_days: default_forecast_days(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: Self::default_config_dir().unwrap_or_else(|_| PathBuf::from(".")),
            weather: WeatherConfig::default(),
            geolocation: GeolocationConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_dir = Self::default_config_dir()?;
        Self::load_from(&config_dir)
    }

    /// Load configuration from `config_dir/config.toml`, writing defaults when missing
    pub fn load_from(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join("config.toml");

        if !config_path.exists() {
            let config = Self {
                config_dir: config_dir.to_path_buf(),
                ..Self::default()
            };
            config.save()?;
            tracing::info!("Wrote default config to {}", config_path.display());
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;

        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
            .context("Failed to parse config file")?;
        config.config_dir = config_dir.to_path_buf();

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns an error if validation fails; warnings are logged.
    pub fn load_validated(config_dir: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match config_dir {
            Some(dir) => Self::load_from(dir)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_url(&self.weather.forecast_url, "weather.forecast_url", &mut result);
        Self::validate_url(&self.weather.geocoding_url, "weather.geocoding_url", &mut result);

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        } else if self.weather.request_timeout_secs > 120 {
            result.add_warning(
                "weather.request_timeout_secs",
                "Request timeout is unusually long (>120s)",
            );
        }

        if self.weather.search_count == 0 {
            result.add_error("weather.search_count", "Search count must be at least 1");
        } else if self.weather.search_count > 100 {
            result.add_error(
                "weather.search_count",
                "Search count cannot exceed 100",
            );
        }

        if self.weather.language.trim().is_empty() {
            result.add_warning("weather.language", "Language is empty; the API default applies");
        }

        if self.geolocation.timeout_ms == 0 {
            result.add_error(
                "geolocation.timeout_ms",
                "Geolocation timeout must be greater than 0",
            );
        }

        match (self.geolocation.latitude, self.geolocation.longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    result.add_error("geolocation.latitude", "Latitude must be within -90..90");
                }
                if !(-180.0..=180.0).contains(&lon) {
                    result.add_error("geolocation.longitude", "Longitude must be within -180..180");
                }
            }
            (None, None) => {
                result.add_warning(
                    "geolocation",
                    "No device position configured - geolocation will be unavailable",
                );
            }
            _ => {
                result.add_error(
                    "geolocation",
                    "Latitude and longitude must be configured together",
                );
            }
        }

        if self.ui.forecast_days < 2 {
            result.add_warning("ui.forecast_days", "Forecast cards disabled (fewer than 2 days)");
        }

        result
    }

    fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to `config_dir/config.toml`
    pub fn save(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir).context("Failed to create config directory")?;

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(self.config_dir.join("config.toml"), contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Path of the persisted state file
    pub fn state_path(&self) -> PathBuf {
        self.config_dir.join("state.json")
    }

    fn default_config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("northwind");

        Ok(config_dir)
    }
}
