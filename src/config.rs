//! Configuration management for the trip planner
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TravelPlannerError;
use crate::itinerary::BookingLinkStyle;
use crate::models::TripDefaults;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TripPlannerConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Flight search provider settings
    #[serde(default)]
    pub flights: FlightsConfig,
    /// Generative model settings
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Itinerary formatting settings
    #[serde(default)]
    pub itinerary: ItineraryConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Initial values for new trip preferences
    #[serde(default)]
    pub defaults: TripDefaults,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// PEM certificate; TLS is used when both paths are set
    pub tls_cert_path: Option<PathBuf>,
    /// PEM private key
    pub tls_key_path: Option<PathBuf>,
}

/// Flight search provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightsConfig {
    /// SerpApi key
    pub api_key: Option<String>,
    #[serde(default = "default_flights_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Base URL of a flight endpoint to compose itineraries against.
    /// When unset the composer queries the provider in-process.
    pub proxy_url: Option<String>,
}

/// Generative model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Gemini API key
    pub api_key: Option<String>,
    #[serde(default = "default_generator_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Itinerary formatting settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ItineraryConfig {
    #[serde(default)]
    pub booking_link: BookingLinkStyle,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Console log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Append-only request log
    #[serde(default = "default_log_file_path")]
    pub file_path: String,
    /// OTLP/HTTP collector endpoint for traces
    pub otlp_endpoint: Option<String>,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_flights_base_url() -> String {
    "https://serpapi.com".to_string()
}

fn default_generator_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_log_file_path() -> String {
    "logs/app.log".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}

impl Default for FlightsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_flights_base_url(),
            timeout_seconds: default_timeout(),
            proxy_url: None,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_generator_base_url(),
            model: default_model(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file_path: default_log_file_path(),
            otlp_endpoint: None,
        }
    }
}

impl TripPlannerConfig {
    /// Load configuration from the given file, or the default locations, then
    /// environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRIP_PLANNER__FLIGHTS__API_KEY -> flights.api_key
        builder = builder.add_source(
            Environment::with_prefix("TRIP_PLANNER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TripPlannerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("trip-planner").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
        if self.flights.base_url.is_empty() {
            self.flights.base_url = default_flights_base_url();
        }
        if self.flights.timeout_seconds == 0 {
            self.flights.timeout_seconds = default_timeout();
        }
        if self.generator.base_url.is_empty() {
            self.generator.base_url = default_generator_base_url();
        }
        if self.generator.model.is_empty() {
            self.generator.model = default_model();
        }
        if self.generator.timeout_seconds == 0 {
            self.generator.timeout_seconds = default_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.logging.file_path.is_empty() {
            self.logging.file_path = default_log_file_path();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        validate_key("Flight search", self.flights.api_key.as_deref())?;
        validate_key("Generator", self.generator.api_key.as_deref())?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.flights.timeout_seconds > 300 {
            return Err(
                TravelPlannerError::config("Flight search timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.generator.timeout_seconds > 300 {
            return Err(
                TravelPlannerError::config("Generator timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.defaults.travelers == 0 {
            return Err(
                TravelPlannerError::config("Default number of travelers must be at least 1").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TravelPlannerError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TravelPlannerError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        validate_url("Flight search base URL", &self.flights.base_url)?;
        validate_url("Generator base URL", &self.generator.base_url)?;
        if let Some(proxy_url) = &self.flights.proxy_url {
            validate_url("Flight proxy URL", proxy_url)?;
        }
        if let Some(endpoint) = &self.logging.otlp_endpoint {
            validate_url("OTLP endpoint", endpoint)?;
        }

        if self.server.tls_cert_path.is_some() != self.server.tls_key_path.is_some() {
            return Err(TravelPlannerError::config(
                "TLS needs both tls_cert_path and tls_key_path",
            )
            .into());
        }

        Ok(())
    }

    /// Address the server binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn validate_key(name: &str, key: Option<&str>) -> Result<()> {
    if let Some(api_key) = key {
        if api_key.is_empty() {
            return Err(TravelPlannerError::config(format!(
                "{name} API key cannot be empty if provided. Either remove it or provide a valid key."
            ))
            .into());
        }

        if api_key.len() < 8 {
            return Err(TravelPlannerError::config(format!(
                "{name} API key appears to be invalid (too short). Please check your API key."
            ))
            .into());
        }

        if api_key.len() > 200 {
            return Err(TravelPlannerError::config(format!(
                "{name} API key appears to be invalid (too long). Please check your API key."
            ))
            .into());
        }
    }
    Ok(())
}

fn validate_url(name: &str, url: &str) -> Result<()> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(
            TravelPlannerError::config(format!("{name} must be a valid HTTP or HTTPS URL")).into(),
        );
    }
    Ok(())
}
