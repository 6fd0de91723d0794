//! Acquiring: workspace creation and the bounded tile fetch
use async_trait::async_trait;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::sync::Arc;

use geogif_core::{PipelineState, RunContext, RunError, Stage};
use geogif_media::{ImageAcquirer, Workspace};
use geogif_services::TileProvider;

pub struct AcquireStage {
    acquirer: ImageAcquirer,
    data_dir: PathBuf,
}

impl AcquireStage {
    pub fn new(
        tiles: Arc<dyn TileProvider>,
        data_dir: PathBuf,
        zoom_range: RangeInclusive<u8>,
        concurrency: usize,
    ) -> Self {
        Self {
            acquirer: ImageAcquirer::new(tiles, zoom_range, concurrency),
            data_dir,
        }
    }
}

#[async_trait]
impl Stage for AcquireStage {
    fn name(&self) -> &'static str {
        "acquire"
    }

    fn state(&self) -> PipelineState {
        PipelineState::Acquiring
    }

    async fn run(&self, ctx: &mut RunContext) -> Result<(), RunError> {
        let coords = ctx.coords.expect("resolver sets coordinates before acquire");

        let workspace = Workspace::create(&self.data_dir, ctx.run_id).await?;
        ctx.workspace = Some(workspace.root().to_path_buf());

        ctx.frames = self.acquirer.acquire(coords, &workspace).await?;
        Ok(())
    }
}
