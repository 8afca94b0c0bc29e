use crate::error::{StylecastError, StylecastResult};
use crate::services::Coordinates;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_DIRECTORY_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_ADVICE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_ADVICE_MODEL: &str = "gemini-2.5-flash";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Member directory service
    pub directory: DirectoryConfig,

    /// Forecast service
    pub weather: WeatherConfig,

    /// Text generation service
    pub advice: AdviceConfig,

    /// Per-request timeout. `None` means a stalled call stalls its run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectoryConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherConfig {
    pub base_url: String,

    /// Display name of the fixed location used by the weather pipeline
    pub home_name: String,

    /// Coordinates of the fixed location
    pub home: Coordinates,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdviceConfig {
    pub base_url: String,
    pub model: String,

    // Never serialized back out
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            directory: DirectoryConfig {
                base_url: DEFAULT_DIRECTORY_URL.to_string(),
            },
            weather: WeatherConfig {
                base_url: DEFAULT_WEATHER_URL.to_string(),
                home_name: "Seoul".to_string(),
                home: Coordinates::new(37.5, 126.9),
            },
            advice: AdviceConfig {
                base_url: DEFAULT_ADVICE_URL.to_string(),
                model: DEFAULT_ADVICE_MODEL.to_string(),
                api_key: None,
            },
            request_timeout_secs: None,
        }
    }
}

impl AppConfig {
    /// Defaults overlaid with `STYLECAST_*` and `GEMINI_API_KEY` environment variables
    pub fn from_env() -> StylecastResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> StylecastResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = AppConfigBuilder::new();

        if let Some(url) = lookup("STYLECAST_DIRECTORY_URL") {
            builder = builder.directory_url(url);
        }
        if let Some(url) = lookup("STYLECAST_WEATHER_URL") {
            builder = builder.weather_url(url);
        }
        if let Some(url) = lookup("STYLECAST_ADVICE_URL") {
            builder = builder.advice_url(url);
        }
        if let Some(model) = lookup("STYLECAST_ADVICE_MODEL") {
            builder = builder.advice_model(model);
        }
        if let Some(key) = lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()) {
            builder = builder.api_key(key);
        }
        if let Some(secs) = lookup("STYLECAST_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|e| {
                StylecastError::ConfigError(format!(
                    "STYLECAST_TIMEOUT_SECS must be a whole number of seconds: {}",
                    e
                ))
            })?;
            builder = builder.timeout_secs(secs);
        }

        builder.build()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Builder for constructing AppConfig instances with a fluent API
///
/// # Example
/// ```
/// use stylecast::config::AppConfigBuilder;
///
/// let config = AppConfigBuilder::new()
///     .directory_url("http://localhost:9000")
///     .api_key("secret")
///     .build()
///     .unwrap();
/// assert_eq!(config.directory.base_url, "http://localhost:9000");
/// ```
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn directory_url(mut self, url: impl Into<String>) -> Self {
        self.config.directory.base_url = url.into();
        self
    }

    pub fn weather_url(mut self, url: impl Into<String>) -> Self {
        self.config.weather.base_url = url.into();
        self
    }

    /// Set the fixed location used by the weather pipeline
    pub fn home(mut self, name: impl Into<String>, coordinates: Coordinates) -> Self {
        self.config.weather.home_name = name.into();
        self.config.weather.home = coordinates;
        self
    }

    pub fn advice_url(mut self, url: impl Into<String>) -> Self {
        self.config.advice.base_url = url.into();
        self
    }

    pub fn advice_model(mut self, model: impl Into<String>) -> Self {
        self.config.advice.model = model.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.advice.api_key = Some(key.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    /// Build the AppConfig instance
    ///
    /// # Errors
    /// Returns `StylecastError::BuilderError` if a URL does not parse, the model
    /// name is empty, the home coordinates are out of range or the timeout is zero
    pub fn build(self) -> StylecastResult<AppConfig> {
        let config = self.config;

        for (field, value) in [
            ("directory.base_url", &config.directory.base_url),
            ("weather.base_url", &config.weather.base_url),
            ("advice.base_url", &config.advice.base_url),
        ] {
            let parsed = Url::parse(value).map_err(|e| {
                StylecastError::BuilderError(format!("{} is not a valid URL ({}): {}", field, value, e))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(StylecastError::BuilderError(format!(
                    "{} must use http or https, got '{}'",
                    field,
                    parsed.scheme()
                )));
            }
        }

        if config.advice.model.trim().is_empty() {
            return Err(StylecastError::BuilderError(
                "advice.model must not be empty".to_string(),
            ));
        }

        if !config.weather.home.is_valid() {
            return Err(StylecastError::BuilderError(format!(
                "home coordinates out of range: {}",
                config.weather.home
            )));
        }

        if config.request_timeout_secs == Some(0) {
            return Err(StylecastError::BuilderError(
                "request timeout must be at least one second".to_string(),
            ));
        }

        Ok(config)
    }
}
