//! Extracting: post batch retrieval and place-candidate extraction
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use geogif_core::{PipelineState, RunContext, RunError, Stage};
use geogif_extract::CandidateExtractor;
use geogif_services::TextSource;

pub struct ExtractStage {
    source: Arc<dyn TextSource>,
    extractor: CandidateExtractor,
    query: String,
    count: u32,
}

impl ExtractStage {
    pub fn new(
        source: Arc<dyn TextSource>,
        extractor: CandidateExtractor,
        query: impl Into<String>,
        count: u32,
    ) -> Self {
        Self {
            source,
            extractor,
            query: query.into(),
            count,
        }
    }
}

#[async_trait]
impl Stage for ExtractStage {
    fn name(&self) -> &'static str {
        "extract"
    }

    fn state(&self) -> PipelineState {
        PipelineState::Extracting
    }

    async fn run(&self, ctx: &mut RunContext) -> Result<(), RunError> {
        let texts = self
            .source
            .search(&self.query, self.count)
            .await
            .map_err(|e| RunError::Service {
                service: "text-source",
                reason: e.to_string(),
            })?;
        info!(posts = texts.len(), "post batch retrieved");

        let (cleaned, candidates) = self.extractor.extract(&texts).await?;

        ctx.raw_texts = texts;
        ctx.cleaned_text = Some(cleaned);
        ctx.candidates = candidates;
        Ok(())
    }
}
