//! Capability interfaces for the three external services.
//!
//! The pipelines only see these traits. Implementations never retry and never
//! touch state outside their return value: one failed call is one error.

pub mod advice;
pub mod directory;
pub mod mock;
pub mod types;
pub mod weather;

pub use advice::GeminiAdvice;
pub use directory::HttpDirectory;
pub use mock::{MockAdvice, MockDirectory, MockWeather};
pub use types::{AdviceRequest, Coordinates, Member, WeatherReport};
pub use weather::OpenMeteoWeather;

use crate::config::AppConfig;
use crate::error::StylecastResult;
use crate::http_client::HttpClient;
use async_trait::async_trait;
use std::sync::Arc;

/// Member directory lookups
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Ordered member keys
    async fn list_members(&self) -> StylecastResult<Vec<String>>;

    /// Detail record for `key`; `NotFound` if the key is absent
    async fn member(&self, key: &str) -> StylecastResult<Member>;
}

/// Forecast lookups
#[async_trait]
pub trait WeatherService: Send + Sync {
    async fn forecast(&self, at: Coordinates) -> StylecastResult<WeatherReport>;
}

/// Natural-language advice generation
///
/// Callers are expected to substitute a fallback text on failure.
#[async_trait]
pub trait AdviceService: Send + Sync {
    async fn advise(&self, request: &AdviceRequest) -> StylecastResult<String>;
}

/// The three service handles a pipeline needs
#[derive(Clone)]
pub struct Services {
    pub directory: Arc<dyn DirectoryService>,
    pub weather: Arc<dyn WeatherService>,
    pub advice: Arc<dyn AdviceService>,
}

impl Services {
    pub fn new(
        directory: Arc<dyn DirectoryService>,
        weather: Arc<dyn WeatherService>,
        advice: Arc<dyn AdviceService>,
    ) -> Self {
        Self {
            directory,
            weather,
            advice,
        }
    }

    /// HTTP-backed services sharing one client
    pub fn from_config(config: &AppConfig) -> StylecastResult<Self> {
        let client = HttpClient::from_config(config)?;
        Ok(Self {
            directory: Arc::new(HttpDirectory::new(client.clone(), &config.directory)),
            weather: Arc::new(OpenMeteoWeather::new(client.clone(), &config.weather)),
            advice: Arc::new(GeminiAdvice::new(client, &config.advice)),
        })
    }
}
