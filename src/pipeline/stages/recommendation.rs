use crate::error::StylecastResult;
use crate::pipeline::{ResultBag, RunContext, Stage};
use crate::services::{AdviceRequest, AdviceService, Member};
use async_trait::async_trait;
use std::sync::Arc;

use super::current_weather::CurrentWeather;
use super::keys;

/// Shown when the recommendation cannot be generated
pub const RECOMMENDATION_FALLBACK: &str =
    "Couldn't put together a fashion recommendation right now. Please try again later.";

/// Stage that asks for a member-specific outfit recommendation
///
/// # Requires
/// - `entity` (`Member`)
/// - `weather` (`{ temp }`)
///
/// # Produces
/// - `recommendation` (string), or [`RECOMMENDATION_FALLBACK`] when the service fails
pub struct FetchRecommendationStage {
    advice: Arc<dyn AdviceService>,
}

impl FetchRecommendationStage {
    pub fn new(advice: Arc<dyn AdviceService>) -> Self {
        Self { advice }
    }
}

#[async_trait]
impl Stage for FetchRecommendationStage {
    fn name(&self) -> &str {
        "fetch_recommendation"
    }

    async fn execute(&self, context: &RunContext) -> StylecastResult<ResultBag> {
        let member: Member = context.bag().get(keys::ENTITY)?;
        let weather: CurrentWeather = context.bag().get(keys::WEATHER)?;

        let request = AdviceRequest::Outfit {
            temperature: weather.temp,
            location: member.location,
            style: member.style,
            gender: member.gender,
        };
        let text = self.advice.advise(&request).await?;
        ResultBag::single(keys::RECOMMENDATION, &text)
    }

    fn fallback(&self, _context: &RunContext) -> Option<ResultBag> {
        ResultBag::single(keys::RECOMMENDATION, RECOMMENDATION_FALLBACK).ok()
    }
}
