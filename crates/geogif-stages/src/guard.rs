//! Guarding: status formatting and the blocklist check
use async_trait::async_trait;
use tracing::debug;

use geogif_core::{PipelineState, RunContext, RunError, Stage};
use geogif_guard::Blocklist;

/// The one status line the bot posts.
fn status_line(location: &str) -> String {
    format!("{location}: you are here.")
}

pub struct GuardStage {
    blocklist: Blocklist,
}

impl GuardStage {
    pub fn new(blocklist: Blocklist) -> Self {
        Self { blocklist }
    }
}

#[async_trait]
impl Stage for GuardStage {
    fn name(&self) -> &'static str {
        "guard"
    }

    fn state(&self) -> PipelineState {
        PipelineState::Guarding
    }

    async fn run(&self, ctx: &mut RunContext) -> Result<(), RunError> {
        let location = ctx.location.as_deref().expect("resolver sets the location");
        let text = status_line(location);

        if let Some(word) = self.blocklist.screen(&text) {
            return Err(RunError::ContentBlocked { word });
        }

        debug!(text = %text, "status text cleared");
        ctx.status_text = Some(text);
        Ok(())
    }
}
