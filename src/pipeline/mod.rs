//! Staged runner for dependent asynchronous stages
//!
//! A run executes its stages strictly in order. Each stage sees the run's
//! input and the outputs of every stage before it, and returns a partial
//! [`ResultBag`] that the runner merges in. Every state change is published
//! to subscribers as a [`RunState`] snapshot.
//!
//! Starting a new run supersedes the one in flight: the old run may keep
//! executing, but nothing it produces is published any more.
//!
//! # Example
//! ```
//! use async_trait::async_trait;
//! use std::sync::Arc;
//! use stylecast::error::StylecastResult;
//! use stylecast::pipeline::{ResultBag, RunContext, RunStatus, Stage, StagedRunner};
//!
//! struct Greet;
//!
//! #[async_trait]
//! impl Stage for Greet {
//!     fn name(&self) -> &str {
//!         "greet"
//!     }
//!
//!     async fn execute(&self, context: &RunContext) -> StylecastResult<ResultBag> {
//!         let name = context.input().get_string("name")?;
//!         ResultBag::single("greeting", &format!("Hello, {}", name))
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> StylecastResult<()> {
//! let runner = StagedRunner::new("greeter");
//! let mut updates = runner.subscribe();
//!
//! let stages: Vec<Arc<dyn Stage>> = vec![Arc::new(Greet)];
//! let outcome = runner
//!     .start(stages, ResultBag::single("name", "Alice")?)
//!     .wait()
//!     .await?;
//!
//! assert!(outcome.succeeded());
//! assert_eq!(runner.state().status, RunStatus::Succeeded);
//! assert_eq!(updates.drain().len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod core;
pub mod executor;
pub mod stages;
pub mod state;

// Re-export main types
pub use context::{ResultBag, RunContext};
pub use core::{RunDisposition, RunOutcome, Stage, StageResult};
pub use executor::{
    CallbackSubscription, RunHandle, StagedRunner, Subscription, DEFAULT_FAILURE_MESSAGE,
};
pub use state::{RunError, RunState, RunStatus};
