use crate::error::StylecastResult;
use async_trait::async_trait;
use std::time::Duration;

use super::context::{ResultBag, RunContext};

/// A single stage in a pipeline
///
/// Each stage reads the run context and returns the partial bag it produced.
/// Stages are executed sequentially by the runner, each after the previous
/// one's output has been merged.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use stylecast::error::StylecastResult;
/// use stylecast::pipeline::{ResultBag, RunContext, Stage};
///
/// struct Shout;
///
/// #[async_trait]
/// impl Stage for Shout {
///     fn name(&self) -> &str {
///         "shout"
///     }
///
///     async fn execute(&self, context: &RunContext) -> StylecastResult<ResultBag> {
///         let input = context.input().get_string("text")?;
///         ResultBag::single("shouted", &input.to_uppercase())
///     }
/// }
/// ```
#[async_trait]
pub trait Stage: Send + Sync {
    /// Stage name for logging and error reporting
    fn name(&self) -> &str;

    /// Execute this stage
    ///
    /// If the stage fails and declares no fallback, the run stops here.
    async fn execute(&self, context: &RunContext) -> StylecastResult<ResultBag>;

    /// Output to substitute when `execute` fails
    ///
    /// Stages whose output is best-effort enrichment return `Some`; such a
    /// stage never fails its run.
    fn fallback(&self, _context: &RunContext) -> Option<ResultBag> {
        None
    }
}

/// Result of a pipeline stage execution
#[derive(Debug, Clone)]
pub struct StageResult {
    /// Stage name
    pub stage_name: String,

    /// Whether the stage succeeded (possibly through its fallback)
    pub success: bool,

    /// Error message if the stage's own execution failed
    pub error: Option<String>,

    /// Duration of execution
    pub duration: Duration,

    /// Whether the fallback output was used
    pub fallback_used: bool,
}

impl StageResult {
    /// Create a successful stage result
    pub fn success(stage_name: impl Into<String>, duration: Duration) -> Self {
        Self {
            stage_name: stage_name.into(),
            success: true,
            error: None,
            duration,
            fallback_used: false,
        }
    }

    /// Create a result for a stage that failed but recovered with its fallback
    pub fn recovered(
        stage_name: impl Into<String>,
        error: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            stage_name: stage_name.into(),
            success: true,
            error: Some(error.into()),
            duration,
            fallback_used: true,
        }
    }

    /// Create a failed stage result
    pub fn failure(
        stage_name: impl Into<String>,
        error: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            stage_name: stage_name.into(),
            success: false,
            error: Some(error.into()),
            duration,
            fallback_used: false,
        }
    }
}

/// How a run ended, from the run's own point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunDisposition {
    /// Every stage completed and the final state was published
    Succeeded,
    /// An essential stage failed and the failure was published
    Failed,
    /// A newer run started first; nothing further was published
    Superseded,
}

/// Result of a complete run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Pipeline name
    pub pipeline_name: String,

    pub run_id: u64,

    pub disposition: RunDisposition,

    /// Results from each stage that finished executing
    pub stage_results: Vec<StageResult>,

    /// Total duration
    pub total_duration: Duration,

    /// Diagnostic error message if failed
    pub error: Option<String>,
}

impl RunOutcome {
    pub fn new(
        pipeline_name: impl Into<String>,
        run_id: u64,
        disposition: RunDisposition,
        stage_results: Vec<StageResult>,
        total_duration: Duration,
    ) -> Self {
        let error = stage_results
            .iter()
            .find(|r| !r.success)
            .and_then(|r| r.error.clone());
        Self {
            pipeline_name: pipeline_name.into(),
            run_id,
            disposition,
            stage_results,
            total_duration,
            error,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.disposition == RunDisposition::Succeeded
    }

    pub fn superseded(&self) -> bool {
        self.disposition == RunDisposition::Superseded
    }

    /// Get the number of stages that finished executing
    pub fn executed_stages(&self) -> usize {
        self.stage_results.len()
    }

    /// Names of the stages that fell back to their declared output
    pub fn fallback_stages(&self) -> Vec<&str> {
        self.stage_results
            .iter()
            .filter(|r| r.fallback_used)
            .map(|r| r.stage_name.as_str())
            .collect()
    }

    /// Get the stage that failed (if any)
    pub fn failed_stage(&self) -> Option<&StageResult> {
        self.stage_results.iter().find(|r| !r.success)
    }
}
