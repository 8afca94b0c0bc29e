use super::{AdviceRequest, AdviceService};
use crate::config::AdviceConfig;
use crate::error::{StylecastError, StylecastResult};
use crate::http_client::HttpClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Gemini `generateContent` client
pub struct GeminiAdvice {
    client: HttpClient,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, parts joined in order
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

impl GeminiAdvice {
    pub fn new(client: HttpClient, config: &AdviceConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl AdviceService for GeminiAdvice {
    async fn advise(&self, request: &AdviceRequest) -> StylecastResult<String> {
        let key = self.api_key.as_deref().ok_or_else(|| {
            StylecastError::Unavailable("no API key configured for the advice service".to_string())
        })?;

        let prompt = request.prompt();
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: &prompt }],
            }],
        };

        let resp: GenerateResponse = self
            .client
            .post_json(&self.endpoint(), &[("key", key.to_string())], &body)
            .await
            .map_err(|e| match e {
                // Unknown model names come back as 404
                StylecastError::NotFound(_) => {
                    StylecastError::Unavailable(format!("model '{}' not found", self.model))
                }
                other => other,
            })?;

        resp.text()
            .ok_or_else(|| StylecastError::Invalid("advice response had no text".to_string()))
    }
}
