use crate::error::StylecastResult;
use crate::pipeline::{ResultBag, RunContext, Stage};
use crate::services::DirectoryService;
use async_trait::async_trait;
use std::sync::Arc;

use super::keys;

/// Stage that looks up the selected member in the directory
///
/// # Requires
/// - input `key` (string): the selected member key
///
/// # Produces
/// - `entity` (`Member`)
///
/// A missing member or an unreachable directory is fatal to the run.
pub struct FetchMemberStage {
    directory: Arc<dyn DirectoryService>,
}

impl FetchMemberStage {
    pub fn new(directory: Arc<dyn DirectoryService>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl Stage for FetchMemberStage {
    fn name(&self) -> &str {
        "fetch_entity"
    }

    async fn execute(&self, context: &RunContext) -> StylecastResult<ResultBag> {
        let key = context.input().get_string(keys::MEMBER_KEY)?;
        let member = self.directory.member(&key).await?;
        ResultBag::single(keys::ENTITY, &member)
    }
}
