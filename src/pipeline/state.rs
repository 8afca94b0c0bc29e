use super::context::ResultBag;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of the runner's published state
///
/// - `Idle` - nothing requested yet, or the last request was a clear
/// - `Running` - a run is executing its stages
/// - `Succeeded` - every stage of the authoritative run completed
/// - `Failed` - an essential stage failed and the run halted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Succeeded | RunStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Idle => "idle",
            RunStatus::Running => "running",
            RunStatus::Succeeded => "succeeded",
            RunStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a run failed: the stage that failed and a message fit for a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunError {
    pub stage: String,
    pub message: String,
}

/// Snapshot of the runner, as delivered to subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunState {
    /// Run this snapshot belongs to
    pub run_id: u64,

    pub status: RunStatus,

    /// Stage executing or last completed; `None` before the first stage finishes
    pub stage_index: Option<usize>,

    /// Outputs of the completed stages of this run
    pub result_bag: ResultBag,

    /// Set only when `status` is `Failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RunError>,
}

impl RunState {
    pub fn idle(run_id: u64) -> Self {
        Self {
            run_id,
            status: RunStatus::Idle,
            stage_index: None,
            result_bag: ResultBag::new(),
            error: None,
        }
    }

    pub(crate) fn running(run_id: u64) -> Self {
        Self {
            status: RunStatus::Running,
            ..Self::idle(run_id)
        }
    }

    pub fn is_busy(&self) -> bool {
        self.status == RunStatus::Running
    }

    /// Stage index as a signed ordinal, `-1` before the first stage completes
    pub fn stage_ordinal(&self) -> i64 {
        self.stage_index.map_or(-1, |i| i as i64)
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::idle(0)
    }
}
