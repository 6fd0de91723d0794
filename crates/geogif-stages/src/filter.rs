//! Filtering: reject used and generic locations
use async_trait::async_trait;

use geogif_core::{PipelineState, RunContext, RunError, Stage};
use geogif_extract::CandidateFilter;

/// Built per run from the ledger snapshot taken at run start, so a name
/// published by the previous run is already rejected here.
pub struct FilterStage {
    filter: CandidateFilter,
}

impl FilterStage {
    pub fn new(used_names: &[String]) -> Self {
        Self {
            filter: CandidateFilter::new(used_names),
        }
    }
}

#[async_trait]
impl Stage for FilterStage {
    fn name(&self) -> &'static str {
        "filter"
    }

    fn state(&self) -> PipelineState {
        PipelineState::Filtering
    }

    async fn run(&self, ctx: &mut RunContext) -> Result<(), RunError> {
        let candidates = std::mem::take(&mut ctx.candidates);
        ctx.candidates = self.filter.apply(candidates)?;
        Ok(())
    }
}
