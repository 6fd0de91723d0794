//! Composing: ordered frames into one animated artifact
use async_trait::async_trait;

use geogif_core::{PipelineState, RunContext, RunError, Stage};
use geogif_media::{AnimationComposer, Workspace};

pub struct ComposeStage {
    composer: AnimationComposer,
}

impl ComposeStage {
    pub fn new(composer: AnimationComposer) -> Self {
        Self { composer }
    }
}

#[async_trait]
impl Stage for ComposeStage {
    fn name(&self) -> &'static str {
        "compose"
    }

    fn state(&self) -> PipelineState {
        PipelineState::Composing
    }

    async fn run(&self, ctx: &mut RunContext) -> Result<(), RunError> {
        let root = ctx
            .workspace
            .clone()
            .expect("acquire creates the workspace before compose");
        let workspace = Workspace::at(root);

        ctx.artifact = Some(self.composer.compose(&ctx.frames, &workspace).await?);
        Ok(())
    }
}
