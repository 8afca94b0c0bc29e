use crate::error::StylecastResult;
use crate::pipeline::{ResultBag, RunContext, Stage};
use crate::services::{AdviceRequest, AdviceService};
use async_trait::async_trait;
use std::sync::Arc;

use super::keys;

/// Shown when the advice service cannot be reached
pub const ADVICE_FALLBACK: &str =
    "Couldn't get outfit advice right now. Please check the API key or model settings.";

/// Stage that asks for outfit advice for the current temperature
///
/// # Requires
/// - `currentTemp` (number)
///
/// # Produces
/// - `advice` (string), or [`ADVICE_FALLBACK`] when the service fails
pub struct FetchAdviceStage {
    advice: Arc<dyn AdviceService>,
    place: String,
}

impl FetchAdviceStage {
    pub fn new(advice: Arc<dyn AdviceService>, place: impl Into<String>) -> Self {
        Self {
            advice,
            place: place.into(),
        }
    }
}

#[async_trait]
impl Stage for FetchAdviceStage {
    fn name(&self) -> &str {
        "fetch_advice"
    }

    async fn execute(&self, context: &RunContext) -> StylecastResult<ResultBag> {
        let temperature = context.bag().get_number(keys::CURRENT_TEMP)?;
        let request = AdviceRequest::Weather {
            temperature,
            place: self.place.clone(),
        };
        let text = self.advice.advise(&request).await?;
        ResultBag::single(keys::ADVICE, &text)
    }

    fn fallback(&self, _context: &RunContext) -> Option<ResultBag> {
        ResultBag::single(keys::ADVICE, ADVICE_FALLBACK).ok()
    }
}
