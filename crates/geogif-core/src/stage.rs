//! Stage Trait: single contract for every pipeline stage
use async_trait::async_trait;

use crate::context::RunContext;
use crate::error::RunError;

/// Pipeline states, in execution order. `Failed` is reachable from any
/// non-terminal state; there is no other branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Extracting,
    Filtering,
    Resolving,
    Acquiring,
    Composing,
    Guarding,
    Publishing,
    Cleaning,
    Done,
    Failed,
}

impl PipelineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Extracting => "extracting",
            Self::Filtering => "filtering",
            Self::Resolving => "resolving",
            Self::Acquiring => "acquiring",
            Self::Composing => "composing",
            Self::Guarding => "guarding",
            Self::Publishing => "publishing",
            Self::Cleaning => "cleaning",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

/// Contract for one unit of the pipeline's sequential execution.
///
/// A stage reads fields earlier stages populated, writes its own fields on
/// the context exactly once, and never holds a reference past its own run.
/// Stages do not recover from their own failures; the runner decides what
/// happens next.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Stable stage identifier (ex: "extract", "resolve").
    fn name(&self) -> &'static str;

    /// The machine state this stage executes under.
    fn state(&self) -> PipelineState;

    /// Execute the stage against the shared run context.
    async fn run(&self, ctx: &mut RunContext) -> Result<(), RunError>;
}
