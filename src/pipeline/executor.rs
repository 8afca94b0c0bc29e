use super::context::{ResultBag, RunContext};
use super::core::{RunDisposition, RunOutcome, Stage, StageResult};
use super::state::{RunError, RunState, RunStatus};
use crate::app_log;
use crate::error::{StylecastError, StylecastResult};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const DEFAULT_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

struct Shared {
    current_run_id: u64,
    state: RunState,
    subscribers: Vec<mpsc::UnboundedSender<RunState>>,
}

impl Shared {
    /// Deliver the current state to every live subscriber, pruning closed ones
    fn broadcast(&mut self) {
        let state = &self.state;
        self.subscribers.retain(|tx| tx.send(state.clone()).is_ok());
    }
}

/// Runs ordered stages against a shared result bag and publishes state
/// after each one.
///
/// Only the most recently started run may publish. Starting a run (or
/// calling [`StagedRunner::reset`]) makes every earlier run inert: its
/// in-flight calls are allowed to finish but their results are dropped.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use stylecast::pipeline::{ResultBag, Stage, StagedRunner};
///
/// # async fn demo(fetch: Arc<dyn Stage>, advise: Arc<dyn Stage>) {
/// let runner = StagedRunner::new("weather");
/// let mut updates = runner.subscribe();
///
/// let handle = runner.start(vec![fetch, advise], ResultBag::new());
/// while let Some(state) = updates.recv().await {
///     println!("{:?} at stage {:?}", state.status, state.stage_index);
///     if state.status.is_terminal() {
///         break;
///     }
/// }
/// let outcome = handle.wait().await.unwrap();
/// # }
/// ```
#[derive(Clone)]
pub struct StagedRunner {
    name: Arc<str>,
    failure_message: Arc<str>,
    shared: Arc<Mutex<Shared>>,
}

impl StagedRunner {
    pub fn new(name: impl Into<String>) -> Self {
        let name: String = name.into();
        Self {
            name: name.into(),
            failure_message: DEFAULT_FAILURE_MESSAGE.into(),
            shared: Arc::new(Mutex::new(Shared {
                current_run_id: 0,
                state: RunState::default(),
                subscribers: Vec::new(),
            })),
        }
    }

    /// Message published in `RunError` when an essential stage fails
    pub fn with_failure_message(mut self, message: impl Into<String>) -> Self {
        let message: String = message.into();
        self.failure_message = message.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // Nothing panics while the lock is held, so a poisoned lock still holds a
    // consistent state.
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Latest published state
    pub fn state(&self) -> RunState {
        self.lock().state.clone()
    }

    pub fn current_run_id(&self) -> u64 {
        self.lock().current_run_id
    }

    pub fn is_busy(&self) -> bool {
        self.lock().state.is_busy()
    }

    /// Receive every state published from now on, in publication order
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().subscribers.push(tx);
        Subscription { rx }
    }

    /// Invoke `callback` for every state published from now on
    ///
    /// Must be called from within a tokio runtime. Delivery stops when the
    /// returned guard is dropped or unsubscribed.
    pub fn subscribe_fn<F>(&self, mut callback: F) -> CallbackSubscription
    where
        F: FnMut(&RunState) + Send + 'static,
    {
        let mut subscription = self.subscribe();
        let task = tokio::spawn(async move {
            while let Some(state) = subscription.recv().await {
                callback(&state);
            }
        });
        CallbackSubscription { task }
    }

    /// Start a new run, superseding any run in flight
    ///
    /// Publishes `Running` with an empty bag and returns at once; the stages
    /// execute on a spawned task. With no stages the run succeeds immediately.
    /// Must be called from within a tokio runtime.
    pub fn start(&self, stages: Vec<Arc<dyn Stage>>, input: ResultBag) -> RunHandle {
        let run_id = {
            let mut shared = self.lock();
            shared.current_run_id += 1;
            let run_id = shared.current_run_id;
            shared.state = if stages.is_empty() {
                RunState {
                    status: RunStatus::Succeeded,
                    ..RunState::idle(run_id)
                }
            } else {
                RunState::running(run_id)
            };
            shared.broadcast();
            run_id
        };

        app_log!(
            LogLevel::Info,
            "pipeline",
            "Starting pipeline '{}' run {} with {} stages",
            self.name,
            run_id,
            stages.len()
        );

        if stages.is_empty() {
            return RunHandle {
                run_id,
                inner: HandleInner::Ready(RunOutcome::new(
                    &*self.name,
                    run_id,
                    RunDisposition::Succeeded,
                    Vec::new(),
                    Duration::ZERO,
                )),
            };
        }

        let runner = self.clone();
        let task = tokio::spawn(async move { runner.drive(run_id, stages, input).await });
        RunHandle {
            run_id,
            inner: HandleInner::Spawned(task),
        }
    }

    /// Start a run and wait for it to end
    pub async fn run(
        &self,
        stages: Vec<Arc<dyn Stage>>,
        input: ResultBag,
    ) -> StylecastResult<RunOutcome> {
        self.start(stages, input).wait().await
    }

    /// Supersede any run in flight and publish `Idle` with an empty bag
    pub fn reset(&self) -> u64 {
        let mut shared = self.lock();
        shared.current_run_id += 1;
        let run_id = shared.current_run_id;
        shared.state = RunState::idle(run_id);
        shared.broadcast();
        run_id
    }

    /// Apply `update` and publish, but only while `run_id` is authoritative
    /// and has not already reached a terminal status
    fn commit(&self, run_id: u64, update: impl FnOnce(&mut RunState)) -> bool {
        let mut shared = self.lock();
        if shared.current_run_id != run_id || shared.state.status.is_terminal() {
            return false;
        }
        update(&mut shared.state);
        shared.broadcast();
        true
    }

    async fn drive(self, run_id: u64, stages: Vec<Arc<dyn Stage>>, input: ResultBag) -> RunOutcome {
        let run_start = Instant::now();
        let total = stages.len();
        let mut context = RunContext::new(run_id, input);
        let mut stage_results = Vec::with_capacity(total);

        for (index, stage) in stages.iter().enumerate() {
            let stage_name = stage.name().to_string();
            tracing::debug!(
                pipeline = %self.name,
                run_id,
                stage = %stage_name,
                "Executing stage {}/{}",
                index + 1,
                total
            );

            let stage_start = Instant::now();
            let result = stage.execute(&context).await;
            let duration = stage_start.elapsed();

            let partial = match result {
                Ok(partial) => {
                    stage_results.push(StageResult::success(&stage_name, duration));
                    partial
                }
                Err(e) => match stage.fallback(&context) {
                    Some(fallback) => {
                        app_log!(
                            LogLevel::Warn,
                            "pipeline",
                            "Stage '{}' failed, using fallback: {} (pipeline: {}, run: {})",
                            stage_name,
                            e,
                            self.name,
                            run_id
                        );
                        stage_results.push(StageResult::recovered(&stage_name, e.to_string(), duration));
                        fallback
                    }
                    None => {
                        app_log!(
                            LogLevel::Error,
                            "pipeline",
                            "Stage '{}' failed: {} (pipeline: {}, run: {})",
                            stage_name,
                            e,
                            self.name,
                            run_id
                        );
                        stage_results.push(StageResult::failure(&stage_name, e.to_string(), duration));

                        let error = RunError {
                            stage: stage_name.clone(),
                            message: self.failure_message.to_string(),
                        };
                        let committed = self.commit(run_id, |state| {
                            state.status = RunStatus::Failed;
                            state.stage_index = Some(index);
                            state.error = Some(error);
                        });

                        let disposition = if committed {
                            RunDisposition::Failed
                        } else {
                            self.log_discarded(run_id, &stage_name);
                            RunDisposition::Superseded
                        };
                        return self.outcome(run_id, disposition, stage_results, run_start);
                    }
                },
            };

            context.merge(partial);
            let is_last = index + 1 == total;
            let bag = context.bag().clone();
            let committed = self.commit(run_id, |state| {
                state.status = if is_last {
                    RunStatus::Succeeded
                } else {
                    RunStatus::Running
                };
                state.stage_index = Some(index);
                state.result_bag = bag;
            });

            if !committed {
                self.log_discarded(run_id, &stage_name);
                return self.outcome(run_id, RunDisposition::Superseded, stage_results, run_start);
            }

            tracing::info!(
                pipeline = %self.name,
                run_id,
                stage = %stage_name,
                duration_ms = duration.as_millis() as u64,
                "Stage completed"
            );
        }

        app_log!(
            LogLevel::Info,
            "pipeline",
            "Pipeline '{}' run {} completed successfully in {:.2}s",
            self.name,
            run_id,
            run_start.elapsed().as_secs_f64()
        );
        self.outcome(run_id, RunDisposition::Succeeded, stage_results, run_start)
    }

    fn log_discarded(&self, run_id: u64, stage_name: &str) {
        app_log!(
            LogLevel::Debug,
            "pipeline",
            "Discarding result of stage '{}' from superseded run {} (pipeline: {})",
            stage_name,
            run_id,
            self.name
        );
    }

    fn outcome(
        &self,
        run_id: u64,
        disposition: RunDisposition,
        stage_results: Vec<StageResult>,
        run_start: Instant,
    ) -> RunOutcome {
        RunOutcome::new(
            &*self.name,
            run_id,
            disposition,
            stage_results,
            run_start.elapsed(),
        )
    }
}

enum HandleInner {
    Ready(RunOutcome),
    Spawned(JoinHandle<RunOutcome>),
}

/// Handle to a started run
///
/// Dropping the handle does not stop the run.
pub struct RunHandle {
    run_id: u64,
    inner: HandleInner,
}

impl RunHandle {
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn is_finished(&self) -> bool {
        match &self.inner {
            HandleInner::Ready(_) => true,
            HandleInner::Spawned(task) => task.is_finished(),
        }
    }

    /// Wait for the run to end
    pub async fn wait(self) -> StylecastResult<RunOutcome> {
        match self.inner {
            HandleInner::Ready(outcome) => Ok(outcome),
            HandleInner::Spawned(task) => task.await.map_err(|e| {
                StylecastError::Internal(format!("run {} task failed: {}", self.run_id, e))
            }),
        }
    }
}

/// Ordered stream of published states
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<RunState>,
}

impl Subscription {
    /// Next published state; `None` once the runner is gone
    pub async fn recv(&mut self) -> Option<RunState> {
        self.rx.recv().await
    }

    /// Next already-published state, without waiting
    pub fn try_recv(&mut self) -> Option<RunState> {
        self.rx.try_recv().ok()
    }

    /// Every state published so far and not yet received
    pub fn drain(&mut self) -> Vec<RunState> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }

    /// Stop delivery. Dropping the subscription has the same effect.
    pub fn unsubscribe(mut self) {
        self.rx.close();
    }
}

/// Guard for a callback registered with [`StagedRunner::subscribe_fn`]
pub struct CallbackSubscription {
    task: JoinHandle<()>,
}

impl CallbackSubscription {
    pub fn unsubscribe(self) {}
}

impl Drop for CallbackSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
