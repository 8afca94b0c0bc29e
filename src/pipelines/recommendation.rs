use crate::app_log;
use crate::error::StylecastResult;
use crate::locations::LocationTable;
use crate::pipeline::stages::{
    keys, FetchCurrentWeatherStage, FetchMemberStage, FetchRecommendationStage,
    ResolveCoordinatesStage,
};
use crate::pipeline::{ResultBag, RunHandle, RunState, Stage, StagedRunner, Subscription};
use crate::services::{DirectoryService, Services};
use crate::view::RecommendationView;
use std::sync::Arc;

pub const RECOMMENDATION_FAILURE_MESSAGE: &str =
    "Could not load the information. Please check the server status.";

/// Member lookup, location resolution, weather, then a recommendation
///
/// Selecting a member starts a run; selecting again supersedes it. Member
/// and weather lookups are essential, the recommendation falls back.
#[derive(Clone)]
pub struct RecommendationPipeline {
    runner: StagedRunner,
    directory: Arc<dyn DirectoryService>,
    stages: Vec<Arc<dyn Stage>>,
}

impl RecommendationPipeline {
    pub const NAME: &'static str = "recommendation";

    pub fn new(services: &Services, locations: LocationTable) -> Self {
        let stages: Vec<Arc<dyn Stage>> = vec![
            Arc::new(FetchMemberStage::new(services.directory.clone())),
            Arc::new(ResolveCoordinatesStage::new(locations)),
            Arc::new(FetchCurrentWeatherStage::new(services.weather.clone())),
            Arc::new(FetchRecommendationStage::new(services.advice.clone())),
        ];
        Self {
            runner: StagedRunner::new(Self::NAME)
                .with_failure_message(RECOMMENDATION_FAILURE_MESSAGE),
            directory: services.directory.clone(),
            stages,
        }
    }

    /// Member keys for the selection list
    ///
    /// A one-shot lookup outside the runner; failures are logged and returned.
    pub async fn load_members(&self) -> StylecastResult<Vec<String>> {
        match self.directory.list_members().await {
            Ok(keys) => {
                app_log!(
                    LogLevel::Debug,
                    "pipelines::recommendation",
                    "Loaded {} member keys",
                    keys.len()
                );
                Ok(keys)
            }
            Err(e) => {
                app_log!(
                    LogLevel::Error,
                    "pipelines::recommendation",
                    "Failed to load member list: {}",
                    e
                );
                Err(e)
            }
        }
    }

    /// Select a member, superseding any run in flight
    ///
    /// An empty key clears the page: the state returns to `Idle` and no
    /// service is called. Returns the started run's handle otherwise.
    pub fn select(&self, key: &str) -> StylecastResult<Option<RunHandle>> {
        if key.is_empty() {
            self.runner.reset();
            return Ok(None);
        }
        let input = ResultBag::single(keys::MEMBER_KEY, key)?;
        Ok(Some(self.runner.start(self.stages.clone(), input)))
    }

    pub fn clear(&self) {
        self.runner.reset();
    }

    pub fn state(&self) -> RunState {
        self.runner.state()
    }

    pub fn view(&self) -> RecommendationView {
        RecommendationView::project(&self.runner.state())
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
