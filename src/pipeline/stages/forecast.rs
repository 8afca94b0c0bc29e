use crate::app_log;
use crate::error::{StylecastError, StylecastResult};
use crate::pipeline::{ResultBag, RunContext, Stage};
use crate::services::{Coordinates, WeatherReport, WeatherService};
use async_trait::async_trait;
use std::sync::Arc;

use super::keys;

/// Stage that fetches current and hourly temperatures for a fixed location
///
/// # Requires
/// - nothing: the coordinates are fixed when the stage is built
///
/// # Produces
/// - `currentTemp` (number)
/// - `hourlyTemps` (array of numbers, covering at least the evening slot)
///
/// Failure is fatal to the run. A series too short to hold the midnight,
/// noon and evening slots is `Invalid`.
pub struct FetchForecastStage {
    weather: Arc<dyn WeatherService>,
    at: Coordinates,
}

impl FetchForecastStage {
    pub fn new(weather: Arc<dyn WeatherService>, at: Coordinates) -> Self {
        Self { weather, at }
    }
}

#[async_trait]
impl Stage for FetchForecastStage {
    fn name(&self) -> &str {
        "fetch_weather"
    }

    async fn execute(&self, context: &RunContext) -> StylecastResult<ResultBag> {
        let report = self.weather.forecast(self.at).await?;

        app_log!(
            LogLevel::Debug,
            "pipeline::forecast",
            "Forecast for {}: {}°C, {} hourly values (run: {})",
            self.at,
            report.current_temp,
            report.hourly_temps.len(),
            context.run_id()
        );

        if report.hourly_temps.len() <= WeatherReport::EVENING {
            return Err(StylecastError::Invalid(format!(
                "forecast for {} has {} hourly values, need at least {}",
                self.at,
                report.hourly_temps.len(),
                WeatherReport::EVENING + 1
            )));
        }

        let mut bag = ResultBag::new();
        bag.insert(keys::CURRENT_TEMP, &report.current_temp)?;
        bag.insert(keys::HOURLY_TEMPS, &report.hourly_temps)?;
        Ok(bag)
    }
}
