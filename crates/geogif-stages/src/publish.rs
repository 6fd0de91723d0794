//! Publishing: media upload then status post
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use geogif_core::{PipelineState, PublishStep, RunContext, RunError, Stage};
use geogif_services::PublishService;

/// Two external calls, no retry on either: a failed upload or post
/// abandons the whole run.
pub struct PublishStage {
    publisher: Arc<dyn PublishService>,
}

impl PublishStage {
    pub fn new(publisher: Arc<dyn PublishService>) -> Self {
        Self { publisher }
    }
}

#[async_trait]
impl Stage for PublishStage {
    fn name(&self) -> &'static str {
        "publish"
    }

    fn state(&self) -> PipelineState {
        PipelineState::Publishing
    }

    async fn run(&self, ctx: &mut RunContext) -> Result<(), RunError> {
        let artifact = ctx.artifact.as_ref().expect("composer sets the artifact");
        let text = ctx
            .status_text
            .as_deref()
            .expect("guard sets the status text");

        let media_id = self
            .publisher
            .upload_media(&artifact.bytes)
            .await
            .map_err(|e| RunError::PublishFailed {
                step: PublishStep::UploadMedia,
                reason: e.to_string(),
            })?;

        let receipt = self
            .publisher
            .publish(text, &media_id)
            .await
            .map_err(|e| RunError::PublishFailed {
                step: PublishStep::PostStatus,
                reason: e.to_string(),
            })?;

        info!(id = %receipt.id, "status published");
        ctx.receipt = Some(receipt);
        Ok(())
    }
}
