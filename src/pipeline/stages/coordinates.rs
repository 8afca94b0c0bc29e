use crate::error::StylecastResult;
use crate::locations::LocationTable;
use crate::pipeline::{ResultBag, RunContext, Stage};
use crate::services::Member;
use async_trait::async_trait;

use super::keys;

/// Stage that maps the member's location to coordinates
///
/// # Requires
/// - `entity` (`Member`)
///
/// # Produces
/// - `coordinates` (`Coordinates`); unknown locations get the table's default
pub struct ResolveCoordinatesStage {
    table: LocationTable,
}

impl ResolveCoordinatesStage {
    pub fn new(table: LocationTable) -> Self {
        Self { table }
    }
}

#[async_trait]
impl Stage for ResolveCoordinatesStage {
    fn name(&self) -> &str {
        "resolve_coordinates"
    }

    async fn execute(&self, context: &RunContext) -> StylecastResult<ResultBag> {
        let member: Member = context.bag().get(keys::ENTITY)?;
        ResultBag::single(keys::COORDINATES, &self.table.resolve(&member.location))
    }
}
