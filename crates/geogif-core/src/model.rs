//! Data Model: candidates, coordinates, frames, artifacts, receipts
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A place name pulled out of the text batch, not yet confirmed to have
/// real-world coordinates. `rank` is the extraction order; filtering must
/// preserve it so the resolver's first-success fallback stays deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub name: String,
    pub rank: usize,
}

impl PlaceCandidate {
    pub fn new(name: impl Into<String>, rank: usize) -> Self {
        Self {
            name: name.into(),
            rank,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// One map tile at one zoom level. `seq` records completion order within
/// the bounded fetch pool; the assembled set is sorted by `zoom`, never by
/// `seq`.
#[derive(Debug, Clone)]
pub struct Frame {
    pub zoom: u8,
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub seq: usize,
}

/// The composed animation on the run workspace.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReceipt {
    pub id: String,
    pub posted_at: DateTime<Utc>,
}
