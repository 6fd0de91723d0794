//! Geogif Ledger: persisted record of previously used locations
//!
//! Read-modify-write over a single JSON file: the whole structure is
//! loaded at run start, mutated in memory, and rewritten in full after a
//! successful publish. Append-only: entries are never edited or removed
//! by the pipeline. Uniqueness is the candidate filter's job, enforced
//! case-insensitively at filter time, not here.
//!
//! Single concurrent run is an external invariant: the scheduler never
//! overlaps invocations, so the file needs no locking.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

use geogif_core::RunError;

/// One successful publish, case-preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub location: String,
    pub posted_at: DateTime<Utc>,
    pub publish_id: String,
}

/// A stored entry. Older data files carried bare location names; newer
/// ones carry full publish metadata. Both load, and both are written back
/// exactly as they came in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredEntry {
    Full(LedgerEntry),
    Name(String),
}

impl StoredEntry {
    pub fn location(&self) -> &str {
        match self {
            Self::Full(entry) => &entry.location,
            Self::Name(name) => name,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    #[serde(default)]
    locations: Vec<StoredEntry>,
}

#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    entries: Vec<StoredEntry>,
}

impl Ledger {
    /// Load the whole ledger. A missing file is an empty ledger (first run
    /// on a fresh data dir); a file that exists but cannot be read or
    /// parsed is a failure.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, RunError> {
        let path = path.into();

        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no ledger file, starting empty");
                return Ok(Self {
                    path,
                    entries: Vec::new(),
                });
            }
            Err(e) => {
                return Err(RunError::LedgerIOFailed(format!(
                    "read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let file: LedgerFile = serde_json::from_str(&raw).map_err(|e| {
            RunError::LedgerIOFailed(format!("parse {}: {}", path.display(), e))
        })?;

        debug!(entries = file.locations.len(), "ledger loaded");
        Ok(Self {
            path,
            entries: file.locations,
        })
    }

    /// Previously used location names, in ledger order.
    pub fn names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.location().to_string())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.entries
            .iter()
            .any(|e| e.location().to_lowercase() == lower)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a successful publish. In-memory only until `save`.
    pub fn append(&mut self, entry: LedgerEntry) {
        info!(location = %entry.location, publish_id = %entry.publish_id, "ledger append");
        self.entries.push(StoredEntry::Full(entry));
    }

    /// Serialize and overwrite the file in full, prior entries unchanged
    /// and in order.
    pub async fn save(&self) -> Result<(), RunError> {
        let file = LedgerFile {
            locations: self.entries.clone(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| RunError::LedgerIOFailed(format!("serialize: {}", e)))?;

        tokio::fs::write(&self.path, json).await.map_err(|e| {
            RunError::LedgerIOFailed(format!("write {}: {}", self.path.display(), e))
        })
    }
}
