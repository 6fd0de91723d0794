//! Resolving: sequential first-success geocode fallback
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use geogif_core::{PipelineState, RunContext, RunError, Stage};
use geogif_services::GeocodeService;

/// Tries candidates strictly in rank order and promotes the first one the
/// geocoder can place. Later candidates are never attempted once one
/// resolves; selection is by list position, not by match quality or
/// latency, so the outcome is deterministic for a given candidate list.
pub struct ResolveStage {
    geocoder: Arc<dyn GeocodeService>,
}

impl ResolveStage {
    pub fn new(geocoder: Arc<dyn GeocodeService>) -> Self {
        Self { geocoder }
    }
}

#[async_trait]
impl Stage for ResolveStage {
    fn name(&self) -> &'static str {
        "resolve"
    }

    fn state(&self) -> PipelineState {
        PipelineState::Resolving
    }

    async fn run(&self, ctx: &mut RunContext) -> Result<(), RunError> {
        let mut tried = 0;

        for candidate in &ctx.candidates {
            tried += 1;
            match self.geocoder.resolve(&candidate.name).await {
                Ok(Some(coords)) => {
                    info!(
                        candidate = %candidate.name,
                        rank = candidate.rank,
                        lat = coords.lat,
                        lng = coords.lng,
                        "coordinates picked"
                    );
                    ctx.location = Some(candidate.name.clone());
                    ctx.coords = Some(coords);
                    return Ok(());
                }
                // Unresolvable is a skip, not a failure.
                Ok(None) => {
                    debug!(candidate = %candidate.name, "no geocode result, skipping");
                }
                Err(e) => {
                    return Err(RunError::Service {
                        service: "geocode",
                        reason: e.to_string(),
                    })
                }
            }
        }

        Err(RunError::NoCoordinatesFound { tried })
    }
}
