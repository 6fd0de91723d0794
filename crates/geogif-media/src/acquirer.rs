//! Bounded-concurrency tile acquisition
use futures::stream::{self, StreamExt};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use geogif_core::{Coordinates, Frame, RunError};
use geogif_services::{ServiceError, TileProvider};

use crate::workspace::Workspace;

/// Worker cap for the fetch pool. The tile provider rate-limits, so the
/// full zoom range is never fanned out at once.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 4;

/// Fetches one tile per zoom level and writes each to the workspace as it
/// arrives. Completion order is whatever the pool yields; the returned
/// sequence is sorted ascending by zoom, which is what makes the composed
/// animation zoom in.
pub struct ImageAcquirer {
    tiles: Arc<dyn TileProvider>,
    zoom_range: RangeInclusive<u8>,
    concurrency: usize,
}

impl ImageAcquirer {
    pub fn new(
        tiles: Arc<dyn TileProvider>,
        zoom_range: RangeInclusive<u8>,
        concurrency: usize,
    ) -> Self {
        Self {
            tiles,
            zoom_range,
            concurrency: concurrency.max(1),
        }
    }

    pub async fn acquire(
        &self,
        coords: Coordinates,
        workspace: &Workspace,
    ) -> Result<Vec<Frame>, RunError> {
        let tasks = self.zoom_range.clone().map(|zoom| {
            let tiles = self.tiles.clone();
            let path = workspace.frame_path(zoom);
            async move {
                let result = fetch_one(tiles.as_ref(), coords, zoom, path.clone()).await;
                (zoom, path, result)
            }
        });

        let completed: Vec<(u8, PathBuf, Result<Vec<u8>, String>)> = stream::iter(tasks)
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut frames = Vec::with_capacity(completed.len());
        let mut failed: Option<(u8, String)> = None;

        for (seq, (zoom, path, result)) in completed.into_iter().enumerate() {
            match result {
                Ok(bytes) => {
                    debug!(zoom, seq, "tile stored");
                    frames.push(Frame {
                        zoom,
                        path,
                        bytes,
                        seq,
                    });
                }
                // Lowest failing zoom wins the error report.
                Err(reason) => {
                    if failed.as_ref().map_or(true, |(z, _)| zoom < *z) {
                        failed = Some((zoom, reason));
                    }
                }
            }
        }

        if let Some((zoom, reason)) = failed {
            // Frames already on disk stay for the cleanup pass.
            return Err(RunError::ImageFetchFailed { zoom, reason });
        }

        frames.sort_by_key(|f| f.zoom);
        info!(frames = frames.len(), "tiles acquired");
        Ok(frames)
    }
}

async fn fetch_one(
    tiles: &dyn TileProvider,
    coords: Coordinates,
    zoom: u8,
    path: PathBuf,
) -> Result<Vec<u8>, String> {
    let bytes = tiles
        .fetch(coords.lat, coords.lng, zoom)
        .await
        .map_err(|e: ServiceError| e.to_string())?;
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| format!("write {}: {}", path.display(), e))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use uuid::Uuid;

    /// Higher zooms answer faster, so completion order is reversed from
    /// dispatch order.
    struct ReversedLatencyTiles;

    #[async_trait]
    impl TileProvider for ReversedLatencyTiles {
        async fn fetch(&self, _lat: f64, _lng: f64, zoom: u8) -> Result<Vec<u8>, ServiceError> {
            tokio::time::sleep(Duration::from_millis((20 - zoom as u64) * 2)).await;
            Ok(vec![zoom])
        }
    }

    struct FailingTiles {
        fail_at: u8,
    }

    #[async_trait]
    impl TileProvider for FailingTiles {
        async fn fetch(&self, _lat: f64, _lng: f64, zoom: u8) -> Result<Vec<u8>, ServiceError> {
            if zoom == self.fail_at {
                Err(ServiceError::from_code("tiles", 500))
            } else {
                Ok(vec![zoom])
            }
        }
    }

    struct CountingTiles {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl TileProvider for CountingTiles {
        async fn fetch(&self, _lat: f64, _lng: f64, zoom: u8) -> Result<Vec<u8>, ServiceError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(vec![zoom])
        }
    }

    fn coords() -> Coordinates {
        Coordinates {
            lat: 48.8566,
            lng: 2.3522,
        }
    }

    async fn workspace(dir: &tempfile::TempDir) -> Workspace {
        Workspace::create(dir.path(), Uuid::new_v4()).await.unwrap()
    }

    #[tokio::test]
    async fn test_frames_sorted_by_zoom_despite_completion_order() {
        let dir = tempfile::tempdir().unwrap();
        let ws = workspace(&dir).await;
        let acquirer = ImageAcquirer::new(Arc::new(ReversedLatencyTiles), 3..=16, 4);

        let frames = acquirer.acquire(coords(), &ws).await.unwrap();

        assert_eq!(frames.len(), 14);
        let zooms: Vec<u8> = frames.iter().map(|f| f.zoom).collect();
        assert_eq!(zooms, (3..=16).collect::<Vec<u8>>());
        // The pool really did finish out of dispatch order.
        assert!(frames.iter().any(|f| f.seq != (f.zoom - 3) as usize));
        // Every frame landed on disk.
        assert!(ws.frame_path(16).is_file());
    }

    #[tokio::test]
    async fn test_single_failure_fails_stage_with_zoom() {
        let dir = tempfile::tempdir().unwrap();
        let ws = workspace(&dir).await;
        let acquirer = ImageAcquirer::new(Arc::new(FailingTiles { fail_at: 5 }), 3..=16, 4);

        let err = acquirer.acquire(coords(), &ws).await.unwrap_err();

        match err {
            RunError::ImageFetchFailed { zoom, .. } => assert_eq!(zoom, 5),
            other => panic!("unexpected error: {other}"),
        }
        // Partial downloads stay on disk for cleanup.
        assert!(ws.frame_path(3).is_file());
    }

    #[tokio::test]
    async fn test_pool_never_exceeds_concurrency_limit() {
        let dir = tempfile::tempdir().unwrap();
        let ws = workspace(&dir).await;
        let tiles = Arc::new(CountingTiles {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let acquirer = ImageAcquirer::new(tiles.clone(), 3..=16, 4);

        acquirer.acquire(coords(), &ws).await.unwrap();

        assert!(tiles.peak.load(Ordering::SeqCst) <= 4);
    }
}
