//! Per-run scratch directory
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use geogif_core::RunError;

/// A run-exclusive directory under the data dir. Nothing else reads or
/// writes it while the run is alive; removal at run end deletes whatever
/// made it to disk, including partial downloads.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Create `run-<id>` under `data_dir`.
    pub async fn create(data_dir: &Path, run_id: Uuid) -> Result<Self, RunError> {
        let root = data_dir.join(format!("run-{run_id}"));
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            RunError::WorkspaceIOFailed(format!("create {}: {}", root.display(), e))
        })?;
        debug!(path = %root.display(), "workspace created");
        Ok(Self { root })
    }

    /// Rebuild the handle from a path recorded on the run context.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn frame_path(&self, zoom: u8) -> PathBuf {
        self.root.join(format!("img{zoom}.jpg"))
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.root.join("animated.gif")
    }

    /// Recursive removal. Idempotent: an already-gone workspace is fine.
    pub async fn remove(&self) -> Result<(), RunError> {
        match tokio::fs::remove_dir_all(&self.root).await {
            Ok(()) => {
                debug!(path = %self.root.display(), "workspace removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RunError::WorkspaceIOFailed(format!(
                "remove {}: {}",
                self.root.display(),
                e
            ))),
        }
    }
}
