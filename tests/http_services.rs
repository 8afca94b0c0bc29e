use axum::extract::{Path, Query};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use stylecast::pipeline::stages::keys;
use stylecast::pipeline::RunStatus;
use stylecast::services::{
    AdviceRequest, AdviceService, Coordinates, DirectoryService, GeminiAdvice, HttpDirectory,
    OpenMeteoWeather, WeatherService,
};
use stylecast::http_client::HttpClient;
use stylecast::pipelines::RECOMMENDATION_FAILURE_MESSAGE;
use stylecast::{AppConfig, AppConfigBuilder, Pipelines};

const API_KEY: &str = "test-key";

async fn list_members() -> Json<Value> {
    Json(json!(["alice", "kim jisoo"]))
}

async fn member(Path(key): Path<String>) -> Response {
    match key.as_str() {
        "alice" => Json(json!({
            "name": "Alice",
            "gender": "f",
            "style": "casual",
            "location": "Busan"
        }))
        .into_response(),
        "kim jisoo" => Json(json!({
            "name": "Jisoo",
            "gender": "f",
            "style": "minimal",
            "location": "Seoul"
        }))
        .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn forecast(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("current_weather").map(String::as_str) != Some("true") {
        return StatusCode::BAD_REQUEST.into_response();
    }
    match params.get("latitude").map(String::as_str) {
        Some("35.1") => Json(json!({
            "current_weather": { "temperature": 12.0 },
            "hourly": { "temperature_2m": [10.0, 11.0, 12.0] }
        }))
        .into_response(),
        Some("37.5") => Json(json!({
            "current_weather": { "temperature": 7.5 },
            "hourly": { "temperature_2m": (0..24).map(f64::from).collect::<Vec<_>>() }
        }))
        .into_response(),
        Some("33.5") => Json(json!({ "current_weather": { "temperature": 9.0 } })).into_response(),
        Some("0") => Json(json!({ "unexpected": true })).into_response(),
        _ => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

/// `generateContent` paths contain a colon, so they are matched by hand
async fn generate(
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    let path = uri.path();
    if !path.starts_with("/v1beta/models/") || !path.ends_with(":generateContent") {
        return StatusCode::NOT_FOUND.into_response();
    }
    if path.contains("missing-model") {
        return StatusCode::NOT_FOUND.into_response();
    }
    if params.get("key").map(String::as_str) != Some(API_KEY) {
        return StatusCode::FORBIDDEN.into_response();
    }

    let prompt = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    if prompt.contains("silent") {
        return Json(json!({ "candidates": [] })).into_response();
    }
    Json(json!({
        "candidates": [{
            "content": { "parts": [{ "text": "Top: knit. " }, { "text": "Shoes: loafers." }] }
        }]
    }))
    .into_response()
}

async fn start_server() -> String {
    let app = Router::new()
        .route("/members", get(list_members))
        .route("/members/:key", get(member))
        .route("/forecast", get(forecast))
        .fallback(generate);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

fn config(base: &str, model: &str) -> AppConfig {
    AppConfigBuilder::new()
        .directory_url(base)
        .weather_url(format!("{}/forecast", base))
        .advice_url(format!("{}/v1beta", base))
        .advice_model(model)
        .api_key(API_KEY)
        .timeout_secs(5)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_directory_over_http() {
    let base = start_server().await;
    let config = config(&base, "gemini-2.5-flash");
    let directory = HttpDirectory::new(HttpClient::from_config(&config).unwrap(), &config.directory);

    assert_eq!(
        directory.list_members().await.unwrap(),
        vec!["alice", "kim jisoo"]
    );
    assert_eq!(directory.member("alice").await.unwrap().location, "Busan");
    // Keys are percent-encoded as one path segment
    assert_eq!(directory.member("kim jisoo").await.unwrap().name, "Jisoo");
    assert!(directory.member("nobody").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_weather_over_http() {
    let base = start_server().await;
    let config = config(&base, "gemini-2.5-flash");
    let weather = OpenMeteoWeather::new(HttpClient::from_config(&config).unwrap(), &config.weather);

    let busan = weather.forecast(Coordinates::new(35.1, 129.0)).await.unwrap();
    assert_eq!(busan.current_temp, 12.0);
    assert_eq!(busan.hourly_temps, vec![10.0, 11.0, 12.0]);

    let seoul = weather.forecast(Coordinates::new(37.5, 126.9)).await.unwrap();
    assert_eq!(seoul.current_temp, 7.5);
    assert_eq!(seoul.hourly_temps.len(), 24);

    // The adapter accepts a forecast without an hourly series
    let jeju = weather.forecast(Coordinates::new(33.5, 126.5)).await.unwrap();
    assert_eq!(jeju.current_temp, 9.0);
    assert!(jeju.hourly_temps.is_empty());

    // Malformed body and server errors both count as unavailable
    assert!(weather
        .forecast(Coordinates::new(0.0, 0.0))
        .await
        .unwrap_err()
        .is_unavailable());
    assert!(weather
        .forecast(Coordinates::new(10.0, 10.0))
        .await
        .unwrap_err()
        .is_unavailable());
}

#[tokio::test]
async fn test_advice_over_http() {
    let base = start_server().await;
    let config = config(&base, "gemini-2.5-flash");
    let advice = GeminiAdvice::new(HttpClient::from_config(&config).unwrap(), &config.advice);

    let text = advice
        .advise(&AdviceRequest::Weather {
            temperature: 7.0,
            place: "Seoul".into(),
        })
        .await
        .unwrap();
    assert_eq!(text, "Top: knit. Shoes: loafers.");

    let empty = advice
        .advise(&AdviceRequest::Weather {
            temperature: 7.0,
            place: "silent".into(),
        })
        .await
        .unwrap_err();
    assert!(empty.is_unavailable());
}

#[tokio::test]
async fn test_advice_unknown_model_is_unavailable() {
    let base = start_server().await;
    let config = config(&base, "missing-model");
    let advice = GeminiAdvice::new(HttpClient::from_config(&config).unwrap(), &config.advice);

    let err = advice
        .advise(&AdviceRequest::Weather {
            temperature: 7.0,
            place: "Seoul".into(),
        })
        .await
        .unwrap_err();
    assert!(err.is_unavailable());
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn test_pipelines_over_http() {
    let base = start_server().await;
    let pipelines = Pipelines::from_config(&config(&base, "gemini-2.5-flash")).unwrap();

    assert_eq!(
        pipelines.recommendation.load_members().await.unwrap(),
        vec!["alice", "kim jisoo"]
    );

    let outcome = pipelines
        .recommendation
        .select("alice")
        .unwrap()
        .unwrap()
        .wait()
        .await
        .unwrap();
    assert!(outcome.succeeded());
    assert!(outcome.fallback_stages().is_empty());

    let view = pipelines.recommendation.view();
    assert_eq!(view.weather_badge.as_deref(), Some("Busan • 12°C"));
    assert_eq!(view.recommendation_lines, vec!["Top: knit. Shoes: loafers."]);

    pipelines.weather.fetch().wait().await.unwrap();
    let weather = pipelines.weather.view();
    assert_eq!(weather.current_temp, Some(7.5));
    assert_eq!(weather.noon_temp, Some(12.0));
    assert_eq!(weather.evening_temp, Some(18.0));
    assert_eq!(weather.advice.as_deref(), Some("Top: knit. Shoes: loafers."));
}

#[tokio::test]
async fn test_weather_pipeline_rejects_forecast_without_hourly_series() {
    let base = start_server().await;
    let config = AppConfigBuilder::new()
        .directory_url(&base)
        .weather_url(format!("{}/forecast", base))
        .home("Jeju", Coordinates::new(33.5, 126.5))
        .advice_url(format!("{}/v1beta", base))
        .api_key(API_KEY)
        .build()
        .unwrap();
    let pipelines = Pipelines::from_config(&config).unwrap();

    let outcome = pipelines.weather.fetch().wait().await.unwrap();

    assert!(!outcome.succeeded());
    let state = pipelines.weather.state();
    assert_eq!(state.status, RunStatus::Failed);
    assert_eq!(
        state.error.unwrap().message,
        "Something went wrong while fetching the weather."
    );
    let view = pipelines.weather.view();
    assert!(view.current_temp.is_none());
    assert!(view.advice.is_none());
}

#[tokio::test]
async fn test_pipelines_with_unreachable_directory() {
    let base = start_server().await;
    let mut config = config(&base, "gemini-2.5-flash");
    config.directory.base_url = "http://127.0.0.1:9".to_string();
    config.advice.model = "missing-model".to_string();
    let pipelines = Pipelines::from_config(&config).unwrap();

    assert!(pipelines.recommendation.load_members().await.is_err());

    pipelines
        .recommendation
        .select("alice")
        .unwrap()
        .unwrap()
        .wait()
        .await
        .unwrap();
    let state = pipelines.recommendation.state();
    assert_eq!(state.status, RunStatus::Failed);
    assert!(!state.result_bag.contains(keys::RECOMMENDATION));
    assert_eq!(state.error.unwrap().message, RECOMMENDATION_FAILURE_MESSAGE);
}
