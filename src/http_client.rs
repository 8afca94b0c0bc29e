//! Thin JSON-over-HTTP adapter shared by every service client.
//!
//! One call is one attempt: there are no retries here.

use crate::config::AppConfig;
use crate::error::{StylecastError, StylecastResult};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Build a client, optionally bounded by a per-request timeout
    pub fn new(timeout: Option<Duration>) -> StylecastResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            StylecastError::ConfigError(format!("Failed to build HTTP client: {}", e))
        })?;
        Ok(Self { client })
    }

    pub fn from_config(config: &AppConfig) -> StylecastResult<Self> {
        Self::new(config.request_timeout())
    }

    /// GET `url` with `query` and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> StylecastResult<T> {
        tracing::debug!(url, "GET");
        let resp = self.client.get(url).query(query).send().await?;
        decode(url, resp).await
    }

    /// POST a JSON `body` to `url` with `query` and decode the JSON reply
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> StylecastResult<T> {
        tracing::debug!(url, "POST");
        let resp = self.client.post(url).query(query).json(body).send().await?;
        decode(url, resp).await
    }
}

async fn decode<T: DeserializeOwned>(url: &str, resp: Response) -> StylecastResult<T> {
    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        return Err(StylecastError::NotFound(url.to_string()));
    }
    if !status.is_success() {
        return Err(StylecastError::Unavailable(format!(
            "{} returned HTTP {}",
            url, status
        )));
    }

    let body = resp.bytes().await?;
    serde_json::from_slice(&body)
        .map_err(|e| StylecastError::Invalid(format!("{}: {}", url, e)))
}
