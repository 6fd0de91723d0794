//! Pipeline Runner: sequences stages over one run context
//!
//! Strictly linear: stages run one after another, the first failure aborts
//! the rest, and cleanup is attempted on every exit path. No stage is ever
//! retried here; a run is a single attempt re-triggered only by the
//! external scheduler.
use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::context::RunContext;
use crate::error::RunError;
use crate::model::PublishReceipt;
use crate::stage::{PipelineState, Stage};

/// End-of-run bookkeeping, injected by the caller.
///
/// The runner is the only place that decides cleanup; stages never attempt
/// their own. `on_success` runs under `Cleaning` after the last stage and
/// may fail the run (a ledger write error is still a run failure).
/// `on_failure` runs after a stage error and must not mask it.
#[async_trait]
pub trait Cleanup: Send + Sync {
    async fn on_success(&self, ctx: &mut RunContext) -> Result<(), RunError>;
    async fn on_failure(&self, ctx: &mut RunContext);
}

/// Per-stage execution record.
#[derive(Debug, Clone)]
pub struct StageTrace {
    pub name: &'static str,
    pub state: PipelineState,
    pub latency_ms: u64,
    pub ok: bool,
}

/// What a completed run produced.
#[derive(Debug)]
pub struct RunReport {
    pub run_id: Uuid,
    pub pipeline_id: String,
    pub traces: Vec<StageTrace>,
    pub receipt: Option<PublishReceipt>,
}

pub struct PipelineRunner {
    stages: Vec<Box<dyn Stage>>,
    cleanup: Box<dyn Cleanup>,
    pipeline_id: String,
}

impl PipelineRunner {
    pub fn new(stages: Vec<Box<dyn Stage>>, cleanup: Box<dyn Cleanup>) -> Self {
        let pipeline_id = stages
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join("→");

        Self {
            stages,
            cleanup,
            pipeline_id,
        }
    }

    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    /// Drive the state machine over the given context.
    ///
    /// Consumes the context: it is discarded when the run ends, whichever
    /// way it ends.
    pub async fn run(&self, mut ctx: RunContext) -> Result<RunReport, RunError> {
        let run_id = ctx.run_id;
        let mut state = PipelineState::Idle;
        let mut traces = Vec::with_capacity(self.stages.len());

        info!(%run_id, pipeline = %self.pipeline_id, "run started");

        for stage in &self.stages {
            debug!(from = state.as_str(), to = stage.state().as_str(), "state transition");
            state = stage.state();

            let start = Instant::now();
            let result = stage.run(&mut ctx).await;
            let latency_ms = start.elapsed().as_millis() as u64;

            match result {
                Ok(()) => {
                    debug!(stage = stage.name(), latency_ms, "stage completed");
                    traces.push(StageTrace {
                        name: stage.name(),
                        state,
                        latency_ms,
                        ok: true,
                    });
                }
                Err(err) => {
                    traces.push(StageTrace {
                        name: stage.name(),
                        state,
                        latency_ms,
                        ok: false,
                    });
                    error!(
                        stage = stage.name(),
                        kind = err.kind(),
                        error = %err,
                        "stage failed, aborting run"
                    );
                    // Best-effort cleanup; the stage error always wins.
                    self.cleanup.on_failure(&mut ctx).await;
                    debug!(from = state.as_str(), to = PipelineState::Failed.as_str(), "state transition");
                    return Err(err);
                }
            }
        }

        debug!(from = state.as_str(), to = PipelineState::Cleaning.as_str(), "state transition");
        state = PipelineState::Cleaning;
        if let Err(err) = self.cleanup.on_success(&mut ctx).await {
            error!(kind = err.kind(), error = %err, "cleanup failed after publish");
            // The workspace still gets its best-effort removal.
            self.cleanup.on_failure(&mut ctx).await;
            return Err(err);
        }

        debug!(from = state.as_str(), to = PipelineState::Done.as_str(), "state transition");
        info!(%run_id, stages = traces.len(), "run complete");

        Ok(RunReport {
            run_id,
            pipeline_id: self.pipeline_id.clone(),
            traces,
            receipt: ctx.receipt.take(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct RecordStage {
        name: &'static str,
        state: PipelineState,
        log: Arc<Mutex<Vec<&'static str>>>,
        fail: bool,
    }

    #[async_trait]
    impl Stage for RecordStage {
        fn name(&self) -> &'static str {
            self.name
        }

        fn state(&self) -> PipelineState {
            self.state
        }

        async fn run(&self, _ctx: &mut RunContext) -> Result<(), RunError> {
            self.log.lock().unwrap().push(self.name);
            if self.fail {
                Err(RunError::NoCandidatesFound)
            } else {
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct RecordCleanup {
        success_calls: AtomicUsize,
        failure_calls: AtomicUsize,
    }

    #[async_trait]
    impl Cleanup for Arc<RecordCleanup> {
        async fn on_success(&self, _ctx: &mut RunContext) -> Result<(), RunError> {
            self.success_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn on_failure(&self, _ctx: &mut RunContext) {
            self.failure_calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn stage(
        name: &'static str,
        state: PipelineState,
        log: &Arc<Mutex<Vec<&'static str>>>,
        fail: bool,
    ) -> Box<dyn Stage> {
        Box::new(RecordStage {
            name,
            state,
            log: log.clone(),
            fail,
        })
    }

    #[tokio::test]
    async fn test_stages_run_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let cleanup = Arc::new(RecordCleanup::default());
        let runner = PipelineRunner::new(
            vec![
                stage("extract", PipelineState::Extracting, &log, false),
                stage("filter", PipelineState::Filtering, &log, false),
                stage("resolve", PipelineState::Resolving, &log, false),
            ],
            Box::new(cleanup.clone()),
        );

        let report = runner.run(RunContext::new()).await.unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["extract", "filter", "resolve"]);
        assert_eq!(report.traces.len(), 3);
        assert!(report.traces.iter().all(|t| t.ok));
        assert_eq!(cleanup.success_calls.load(Ordering::SeqCst), 1);
        assert_eq!(cleanup.failure_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_short_circuits() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let cleanup = Arc::new(RecordCleanup::default());
        let runner = PipelineRunner::new(
            vec![
                stage("extract", PipelineState::Extracting, &log, false),
                stage("filter", PipelineState::Filtering, &log, true),
                stage("resolve", PipelineState::Resolving, &log, false),
            ],
            Box::new(cleanup.clone()),
        );

        let err = runner.run(RunContext::new()).await.unwrap_err();

        assert!(matches!(err, RunError::NoCandidatesFound));
        // The stage after the failure never starts.
        assert_eq!(*log.lock().unwrap(), vec!["extract", "filter"]);
        assert_eq!(cleanup.success_calls.load(Ordering::SeqCst), 0);
        assert_eq!(cleanup.failure_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cleanup_error_fails_run() {
        struct FailingCleanup;

        #[async_trait]
        impl Cleanup for FailingCleanup {
            async fn on_success(&self, _ctx: &mut RunContext) -> Result<(), RunError> {
                Err(RunError::LedgerIOFailed("disk full".into()))
            }

            async fn on_failure(&self, _ctx: &mut RunContext) {}
        }

        let log = Arc::new(Mutex::new(Vec::new()));
        let runner = PipelineRunner::new(
            vec![stage("extract", PipelineState::Extracting, &log, false)],
            Box::new(FailingCleanup),
        );

        let err = runner.run(RunContext::new()).await.unwrap_err();
        assert!(matches!(err, RunError::LedgerIOFailed(_)));
    }

    #[test]
    fn test_pipeline_id_joins_stage_names() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let cleanup = Arc::new(RecordCleanup::default());
        let runner = PipelineRunner::new(
            vec![
                stage("extract", PipelineState::Extracting, &log, false),
                stage("filter", PipelineState::Filtering, &log, false),
            ],
            Box::new(cleanup),
        );
        assert_eq!(runner.pipeline_id(), "extract→filter");
    }
}
