use crate::config::AppConfig;
use crate::pipeline::stages::{FetchAdviceStage, FetchForecastStage};
use crate::pipeline::{ResultBag, RunHandle, RunState, Stage, StagedRunner, Subscription};
use crate::services::{Coordinates, Services};
use crate::view::WeatherView;
use std::sync::Arc;

pub const WEATHER_FAILURE_MESSAGE: &str = "Something went wrong while fetching the weather.";

/// Forecast for a fixed place followed by outfit advice
///
/// The forecast is essential; advice falls back to a fixed text.
#[derive(Clone)]
pub struct WeatherPipeline {
    runner: StagedRunner,
    stages: Vec<Arc<dyn Stage>>,
}

impl WeatherPipeline {
    pub const NAME: &'static str = "weather";

    pub fn new(services: &Services, place: impl Into<String>, at: Coordinates) -> Self {
        let stages: Vec<Arc<dyn Stage>> = vec![
            Arc::new(FetchForecastStage::new(services.weather.clone(), at)),
            Arc::new(FetchAdviceStage::new(services.advice.clone(), place)),
        ];
        Self {
            runner: StagedRunner::new(Self::NAME).with_failure_message(WEATHER_FAILURE_MESSAGE),
            stages,
        }
    }

    /// Pipeline for the configured home location
    pub fn from_config(services: &Services, config: &AppConfig) -> Self {
        Self::new(services, &config.weather.home_name, config.weather.home)
    }

    /// Start a fresh fetch, superseding one in flight
    pub fn fetch(&self) -> RunHandle {
        self.runner.start(self.stages.clone(), ResultBag::new())
    }

    pub fn state(&self) -> RunState {
        self.runner.state()
    }

    pub fn view(&self) -> WeatherView {
        WeatherView::project(&self.runner.state())
    }

    pub fn is_busy(&self) -> bool {
        self.runner.is_busy()
    }

    pub fn subscribe(&self) -> Subscription {
        self.runner.subscribe()
    }

    pub fn runner(&self) -> &StagedRunner {
        &self.runner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::stages::{keys, ADVICE_FALLBACK};
    use crate::pipeline::RunStatus;
    use crate::services::{AdviceRequest, MockAdvice, MockDirectory, MockWeather, WeatherReport};

    fn services(weather: MockWeather, advice: MockAdvice) -> Services {
        Services::new(
            Arc::new(MockDirectory::new()),
            Arc::new(weather),
            Arc::new(advice),
        )
    }

    fn seoul() -> Coordinates {
        Coordinates::new(37.5, 126.9)
    }

    #[tokio::test]
    async fn test_fetch_succeeds_with_advice() {
        let advice = Arc::new(MockAdvice::new("Wear a coat."));
        let services = Services::new(
            Arc::new(MockDirectory::new()),
            Arc::new(MockWeather::full_day(7.0)),
            advice.clone(),
        );
        let pipeline = WeatherPipeline::new(&services, "Seoul", seoul());

        let outcome = pipeline.fetch().wait().await.unwrap();

        assert!(outcome.succeeded());
        let state = pipeline.state();
        assert_eq!(state.status, RunStatus::Succeeded);
        assert_eq!(state.result_bag.get_number(keys::CURRENT_TEMP).unwrap(), 7.0);
        assert_eq!(state.result_bag.get_string(keys::ADVICE).unwrap(), "Wear a coat.");
        assert_eq!(advice.requests()[0].temperature(), 7.0);
        assert!(matches!(
            &advice.requests()[0],
            AdviceRequest::Weather { place, .. } if place == "Seoul"
        ));
    }

    #[tokio::test]
    async fn test_weather_failure_fails_the_run() {
        let advice = Arc::new(MockAdvice::new("unused"));
        let services = Services::new(
            Arc::new(MockDirectory::new()),
            Arc::new(MockWeather::unavailable()),
            advice.clone(),
        );
        let pipeline = WeatherPipeline::new(&services, "Seoul", seoul());

        pipeline.fetch().wait().await.unwrap();

        let state = pipeline.state();
        assert_eq!(state.status, RunStatus::Failed);
        assert_eq!(state.stage_index, Some(0));
        assert_eq!(state.error.unwrap().message, WEATHER_FAILURE_MESSAGE);
        assert!(state.result_bag.is_empty());
        assert_eq!(advice.calls(), 0);
    }

    #[tokio::test]
    async fn test_forecast_without_hourly_series_fails_the_run() {
        let advice = Arc::new(MockAdvice::new("unused"));
        let services = Services::new(
            Arc::new(MockDirectory::new()),
            Arc::new(MockWeather::current(7.0)),
            advice.clone(),
        );
        let pipeline = WeatherPipeline::new(&services, "Seoul", seoul());

        let outcome = pipeline.fetch().wait().await.unwrap();

        assert_eq!(outcome.failed_stage().unwrap().stage_name, "fetch_weather");
        let state = pipeline.state();
        assert_eq!(state.status, RunStatus::Failed);
        assert!(!state.result_bag.contains(keys::HOURLY_TEMPS));
        assert_eq!(state.error.unwrap().message, WEATHER_FAILURE_MESSAGE);
        assert_eq!(advice.calls(), 0);
    }

    #[tokio::test]
    async fn test_advice_failure_degrades() {
        let pipeline = WeatherPipeline::new(
            &services(MockWeather::full_day(7.0), MockAdvice::unavailable()),
            "Seoul",
            seoul(),
        );

        let outcome = pipeline.fetch().wait().await.unwrap();

        assert!(outcome.succeeded());
        assert_eq!(outcome.fallback_stages(), vec!["fetch_advice"]);
        let view = pipeline.view();
        assert_eq!(view.current_temp, Some(7.0));
        assert_eq!(view.advice.as_deref(), Some(ADVICE_FALLBACK));
        assert!(view.error.is_none());
    }

    #[tokio::test]
    async fn test_refetch_replaces_previous_values() {
        let weather = MockWeather::new(WeatherReport {
            current_temp: 20.0,
            hourly_temps: vec![1.0; 24],
        });
        let pipeline = WeatherPipeline::new(
            &services(weather, MockAdvice::new("Light jacket.")),
            "Seoul",
            seoul(),
        );

        pipeline.fetch().wait().await.unwrap();
        let first = pipeline.state().run_id;
        pipeline.fetch().wait().await.unwrap();

        let state = pipeline.state();
        assert_eq!(state.run_id, first + 1);
        assert_eq!(state.status, RunStatus::Succeeded);
        assert_eq!(pipeline.view().noon_temp, Some(1.0));
    }

    #[tokio::test]
    async fn test_from_config_uses_home() {
        let weather = Arc::new(MockWeather::full_day(3.0));
        let services = Services::new(
            Arc::new(MockDirectory::new()),
            weather.clone(),
            Arc::new(MockAdvice::new("ok")),
        );
        let config = AppConfig::default();
        let pipeline = WeatherPipeline::from_config(&services, &config);

        pipeline.fetch().wait().await.unwrap();

        assert_eq!(weather.requested(), vec![config.weather.home]);
    }
}
