//! Run Context: shared state flowing forward through the pipeline
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use uuid::Uuid;

use crate::model::{Artifact, Coordinates, Frame, PlaceCandidate, PublishReceipt};

/// Mutable accumulator owned by the runner for the duration of one run.
///
/// Data flows strictly forward: each field is written exactly once, by
/// exactly one stage, and never read by an earlier stage. The context is
/// created at run start and discarded at run end on both exit paths.
#[derive(Debug)]
pub struct RunContext {
    pub run_id: Uuid,
    pub started: DateTime<Utc>,
    /// Raw post batch from the text source.
    pub raw_texts: Vec<String>,
    /// Batch after URL/mention/marker scrubbing.
    pub cleaned_text: Option<String>,
    /// Plausible place names, in extraction order.
    pub candidates: Vec<PlaceCandidate>,
    /// The one candidate promoted to resolved, case preserved.
    pub location: Option<String>,
    pub coords: Option<Coordinates>,
    /// Root of the per-run scratch directory, exclusively owned by this run.
    pub workspace: Option<PathBuf>,
    /// Tile frames, ascending by zoom once the acquire stage completes.
    pub frames: Vec<Frame>,
    pub artifact: Option<Artifact>,
    pub status_text: Option<String>,
    pub receipt: Option<PublishReceipt>,
}

impl RunContext {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started: Utc::now(),
            raw_texts: Vec::new(),
            cleaned_text: None,
            candidates: Vec::new(),
            location: None,
            coords: None,
            workspace: None,
            frames: Vec::new(),
            artifact: None,
            status_text: None,
            receipt: None,
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}
