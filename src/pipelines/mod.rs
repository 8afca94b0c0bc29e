//! The two pipelines the application exposes
//!
//! - [`WeatherPipeline`]: forecast for a fixed place, then outfit advice
//! - [`RecommendationPipeline`]: member, coordinates, weather, then a
//!   member-specific recommendation

pub mod recommendation;
pub mod weather;

pub use recommendation::{RecommendationPipeline, RECOMMENDATION_FAILURE_MESSAGE};
pub use weather::{WeatherPipeline, WEATHER_FAILURE_MESSAGE};

use crate::config::AppConfig;
use crate::error::StylecastResult;
use crate::locations::LocationTable;
use crate::services::Services;

/// Both pipelines wired to one set of services
#[derive(Clone)]
pub struct Pipelines {
    pub weather: WeatherPipeline,
    pub recommendation: RecommendationPipeline,
}

impl Pipelines {
    pub fn new(services: &Services, config: &AppConfig, locations: LocationTable) -> Self {
        Self {
            weather: WeatherPipeline::from_config(services, config),
            recommendation: RecommendationPipeline::new(services, locations),
        }
    }

    /// HTTP-backed pipelines with the default location table
    pub fn from_config(config: &AppConfig) -> StylecastResult<Self> {
        let services = Services::from_config(config)?;
        Ok(Self::new(&services, config, LocationTable::default()))
    }
}
