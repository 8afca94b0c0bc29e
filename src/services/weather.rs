use super::{Coordinates, WeatherReport, WeatherService};
use crate::config::WeatherConfig;
use crate::error::{StylecastError, StylecastResult};
use crate::http_client::HttpClient;
use async_trait::async_trait;
use serde::Deserialize;

/// Open-Meteo forecast client
pub struct OpenMeteoWeather {
    client: HttpClient,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
    #[serde(default)]
    hourly: Option<Hourly>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct Hourly {
    #[serde(default)]
    temperature_2m: Vec<f64>,
}

impl OpenMeteoWeather {
    pub fn new(client: HttpClient, config: &WeatherConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
        }
    }

    fn query(at: Coordinates) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", at.lat.to_string()),
            ("longitude", at.lon.to_string()),
            ("current_weather", "true".to_string()),
            ("hourly", "temperature_2m".to_string()),
        ]
    }
}

impl From<ForecastResponse> for WeatherReport {
    fn from(resp: ForecastResponse) -> Self {
        WeatherReport {
            current_temp: resp.current_weather.temperature,
            hourly_temps: resp.hourly.map(|h| h.temperature_2m).unwrap_or_default(),
        }
    }
}

#[async_trait]
impl WeatherService for OpenMeteoWeather {
    async fn forecast(&self, at: Coordinates) -> StylecastResult<WeatherReport> {
        let resp: ForecastResponse = self
            .client
            .get_json(&self.base_url, &Self::query(at))
            .await
            .map_err(|e| match e {
                // A forecast endpoint has no "absent key"; a 404 means a bad endpoint
                StylecastError::NotFound(url) => {
                    StylecastError::Unavailable(format!("forecast endpoint not found: {}", url))
                }
                other => other,
            })?;
        Ok(resp.into())
    }
}
