use crate::error::StylecastResult;
use crate::pipeline::{ResultBag, RunContext, Stage};
use crate::services::{Coordinates, WeatherService};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::keys;

/// Current temperature at the member's location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temp: f64,
}

/// Stage that fetches the current temperature at resolved coordinates
///
/// # Requires
/// - `coordinates` (`Coordinates`)
///
/// # Produces
/// - `weather` (`{ temp }`)
///
/// Failure is fatal to the run.
pub struct FetchCurrentWeatherStage {
    weather: Arc<dyn WeatherService>,
}

impl FetchCurrentWeatherStage {
    pub fn new(weather: Arc<dyn WeatherService>) -> Self {
        Self { weather }
    }
}

#[async_trait]
impl Stage for FetchCurrentWeatherStage {
    fn name(&self) -> &str {
        "fetch_weather"
    }

    async fn execute(&self, context: &RunContext) -> StylecastResult<ResultBag> {
        let at: Coordinates = context.bag().get(keys::COORDINATES)?;
        let report = self.weather.forecast(at).await?;
        ResultBag::single(
            keys::WEATHER,
            &CurrentWeather {
                temp: report.current_temp,
            },
        )
    }
}
