//! Candidate extraction: entity detection + plausibility filter
use std::sync::Arc;
use tracing::{debug, info};

use geogif_core::{PlaceCandidate, RunError};
use geogif_services::{EntityKind, EntityService};

use crate::normalizer;

/// Names shorter than this are too ambiguous to geocode reliably.
const MIN_NAME_CHARS: usize = 3;

pub struct CandidateExtractor {
    entities: Arc<dyn EntityService>,
}

impl CandidateExtractor {
    pub fn new(entities: Arc<dyn EntityService>) -> Self {
        Self { entities }
    }

    /// Scrub the batch, detect entities, and keep the plausible places.
    ///
    /// Rank is the entity's position in the service's response, recorded
    /// before the plausibility filter so downstream ordering reflects the
    /// original extraction order. Returns the cleaned text alongside the
    /// candidates.
    pub async fn extract(
        &self,
        texts: &[String],
    ) -> Result<(String, Vec<PlaceCandidate>), RunError> {
        let cleaned = normalizer::scrub(texts);
        debug!(chars = cleaned.len(), "batch scrubbed");

        let entities = self
            .entities
            .detect_places(&cleaned)
            .await
            .map_err(|e| RunError::Service {
                service: "language",
                reason: e.to_string(),
            })?;

        let candidates: Vec<PlaceCandidate> = entities
            .into_iter()
            .enumerate()
            .filter(|(_, e)| {
                e.kind == EntityKind::Place && e.name.chars().count() >= MIN_NAME_CHARS
            })
            .map(|(rank, e)| PlaceCandidate::new(e.name, rank))
            .collect();

        if candidates.is_empty() {
            return Err(RunError::NoCandidatesFound);
        }

        info!(count = candidates.len(), "place candidates found");
        Ok((cleaned, candidates))
    }
}
