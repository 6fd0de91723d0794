//! Pipeline assembly and end-of-run bookkeeping
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use geogif_core::{Cleanup, PipelineRunner, RunContext, RunError, RunReport, Stage};
use geogif_extract::CandidateExtractor;
use geogif_guard::Blocklist;
use geogif_ledger::{Ledger, LedgerEntry};
use geogif_media::{AnimationComposer, FrameEncoder, Workspace};
use geogif_services::{
    EntityService, GeocodeService, PublishService, TextSource, TileProvider,
};

use crate::{
    AcquireStage, ComposeStage, ExtractStage, FilterStage, GuardStage, PublishStage, ResolveStage,
};

/// Everything a run needs from the outside world.
#[derive(Clone)]
pub struct Collaborators {
    pub text_source: Arc<dyn TextSource>,
    pub entities: Arc<dyn EntityService>,
    pub geocoder: Arc<dyn GeocodeService>,
    pub tiles: Arc<dyn TileProvider>,
    pub encoder: Arc<dyn FrameEncoder>,
    pub publisher: Arc<dyn PublishService>,
}

/// Per-deployment knobs, defaulted to the bot's historical behavior.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub query: String,
    pub count: u32,
    pub base_zoom: u8,
    pub zoom_levels: u8,
    pub fetch_concurrency: usize,
    pub frame_delay_ms: u32,
    pub data_dir: PathBuf,
    pub ledger_path: PathBuf,
    pub blocklist: Blocklist,
}

impl PipelineConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let ledger_path = data_dir.join("data.json");
        Self {
            query: "a".to_string(),
            count: 25,
            base_zoom: 3,
            zoom_levels: 14,
            fetch_concurrency: geogif_media::DEFAULT_FETCH_CONCURRENCY,
            frame_delay_ms: geogif_media::DEFAULT_FRAME_DELAY_MS,
            data_dir,
            ledger_path,
            blocklist: Blocklist::new(),
        }
    }

    /// Contiguous zoom levels, lowest first.
    pub fn zoom_range(&self) -> std::ops::RangeInclusive<u8> {
        self.base_zoom..=self.base_zoom + self.zoom_levels.saturating_sub(1)
    }
}

/// End-of-run bookkeeping: the only place the ledger is written and the
/// workspace removed.
struct RunJanitor {
    ledger: tokio::sync::Mutex<Ledger>,
}

impl RunJanitor {
    fn new(ledger: Ledger) -> Self {
        Self {
            ledger: tokio::sync::Mutex::new(ledger),
        }
    }

    async fn remove_workspace(ctx: &mut RunContext) {
        if let Some(root) = ctx.workspace.take() {
            if let Err(e) = Workspace::at(root).remove().await {
                // Leftover scratch files are a nuisance, not a run failure.
                warn!(error = %e, "workspace cleanup failed");
            }
        }
    }
}

#[async_trait]
impl Cleanup for RunJanitor {
    async fn on_success(&self, ctx: &mut RunContext) -> Result<(), RunError> {
        let location = ctx.location.clone().expect("resolver sets the location");
        let receipt = ctx.receipt.clone().expect("publish sets the receipt");

        // Ledger first, exactly once per successful run, then the scratch dir.
        let mut ledger = self.ledger.lock().await;
        ledger.append(LedgerEntry {
            location,
            posted_at: receipt.posted_at,
            publish_id: receipt.id,
        });
        ledger.save().await?;

        Self::remove_workspace(ctx).await;
        Ok(())
    }

    async fn on_failure(&self, ctx: &mut RunContext) {
        Self::remove_workspace(ctx).await;
    }
}

/// Assemble the fixed stage sequence over a ledger snapshot.
pub fn build_pipeline(
    collab: &Collaborators,
    config: &PipelineConfig,
    ledger: Ledger,
) -> PipelineRunner {
    let used_names = ledger.names();

    let stages: Vec<Box<dyn Stage>> = vec![
        Box::new(ExtractStage::new(
            collab.text_source.clone(),
            CandidateExtractor::new(collab.entities.clone()),
            config.query.clone(),
            config.count,
        )),
        Box::new(FilterStage::new(&used_names)),
        Box::new(ResolveStage::new(collab.geocoder.clone())),
        Box::new(AcquireStage::new(
            collab.tiles.clone(),
            config.data_dir.clone(),
            config.zoom_range(),
            config.fetch_concurrency,
        )),
        Box::new(ComposeStage::new(AnimationComposer::new(
            collab.encoder.clone(),
            config.frame_delay_ms,
        ))),
        Box::new(GuardStage::new(config.blocklist.clone())),
        Box::new(PublishStage::new(collab.publisher.clone())),
    ];

    PipelineRunner::new(stages, Box::new(RunJanitor::new(ledger)))
}

/// One complete run: load the ledger, build the pipeline, drive it.
///
/// The ledger file is read here, once, and written back only by the
/// janitor after a successful publish. The external scheduler guarantees
/// a single concurrent run.
pub async fn run_once(
    collab: &Collaborators,
    config: &PipelineConfig,
) -> Result<RunReport, RunError> {
    let ledger = Ledger::load(&config.ledger_path).await?;
    let runner = build_pipeline(collab, config, ledger);
    runner.run(RunContext::new()).await
}
