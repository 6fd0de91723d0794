//! Animation composition over an external frame encoder
use std::sync::Arc;
use tracing::info;

use geogif_core::{Artifact, Frame, RunError};

use crate::workspace::Workspace;

/// Per-frame display time. 300 ms over 14 zoom levels gives the ~4 second
/// zoom-in the bot has always posted.
pub const DEFAULT_FRAME_DELAY_MS: u32 = 300;

/// Encoder boundary. Takes frames already in display order and a per-frame
/// delay, returns the encoded artifact bytes. Implementations do blocking
/// work; the composer moves them off the async runtime.
pub trait FrameEncoder: Send + Sync {
    fn compose(&self, frames: &[Frame], frame_delay_ms: u32) -> Result<Vec<u8>, String>;
}

/// Thin wrapper that orders the frames, invokes the encoder, and writes
/// the artifact to the workspace. No partial-output reconciliation: an
/// encoder error fails the stage outright.
pub struct AnimationComposer {
    encoder: Arc<dyn FrameEncoder>,
    frame_delay_ms: u32,
}

impl AnimationComposer {
    pub fn new(encoder: Arc<dyn FrameEncoder>, frame_delay_ms: u32) -> Self {
        Self {
            encoder,
            frame_delay_ms,
        }
    }

    pub async fn compose(
        &self,
        frames: &[Frame],
        workspace: &Workspace,
    ) -> Result<Artifact, RunError> {
        let mut ordered = frames.to_vec();
        ordered.sort_by_key(|f| f.zoom);

        let encoder = self.encoder.clone();
        let delay = self.frame_delay_ms;
        let bytes = tokio::task::spawn_blocking(move || encoder.compose(&ordered, delay))
            .await
            .map_err(|e| RunError::EncodeFailed(format!("encoder task: {e}")))?
            .map_err(RunError::EncodeFailed)?;

        let path = workspace.artifact_path();
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| RunError::EncodeFailed(format!("write {}: {}", path.display(), e)))?;

        info!(size = bytes.len(), frames = frames.len(), "animation composed");
        Ok(Artifact { path, bytes })
    }
}

/// GIF encoder backed by the image crate: decodes each stored tile and
/// re-encodes the set as an endlessly looping animation.
pub struct GifComposer;

impl FrameEncoder for GifComposer {
    fn compose(&self, frames: &[Frame], frame_delay_ms: u32) -> Result<Vec<u8>, String> {
        let mut out = Vec::new();
        {
            let mut encoder = image::codecs::gif::GifEncoder::new(&mut out);
            encoder
                .set_repeat(image::codecs::gif::Repeat::Infinite)
                .map_err(|e| e.to_string())?;

            for frame in frames {
                let img = image::load_from_memory(&frame.bytes)
                    .map_err(|e| format!("decode zoom {}: {}", frame.zoom, e))?;
                let delay = image::Delay::from_numer_denom_ms(frame_delay_ms, 1);
                let gif_frame = image::Frame::from_parts(img.to_rgba8(), 0, 0, delay);
                encoder
                    .encode_frame(gif_frame)
                    .map_err(|e| format!("encode zoom {}: {}", frame.zoom, e))?;
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::AnimationDecoder;
    use std::io::Cursor;
    use uuid::Uuid;

    fn jpeg_bytes(shade: u8) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(8, 8, image::Rgb([shade, shade, shade]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image::ImageFormat::Jpeg)
            .unwrap();
        out.into_inner()
    }

    fn frame(zoom: u8, seq: usize) -> Frame {
        Frame {
            zoom,
            path: format!("/tmp/img{zoom}.jpg").into(),
            bytes: jpeg_bytes(zoom * 10),
            seq,
        }
    }

    #[test]
    fn test_gif_has_one_frame_per_tile() {
        let frames = vec![frame(3, 1), frame(4, 0), frame(5, 2)];
        let bytes = GifComposer.compose(&frames, 300).unwrap();

        let decoder = image::codecs::gif::GifDecoder::new(Cursor::new(bytes)).unwrap();
        let decoded = decoder.into_frames().collect_frames().unwrap();
        assert_eq!(decoded.len(), 3);
    }

    #[test]
    fn test_undecodable_tile_is_an_error() {
        let mut bad = frame(3, 0);
        bad.bytes = b"not a jpeg".to_vec();
        let err = GifComposer.compose(&[bad], 300).unwrap_err();
        assert!(err.contains("zoom 3"));
    }

    #[tokio::test]
    async fn test_composer_writes_artifact_to_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::create(dir.path(), Uuid::new_v4()).await.unwrap();

        let composer = AnimationComposer::new(Arc::new(GifComposer), DEFAULT_FRAME_DELAY_MS);
        let artifact = composer
            .compose(&[frame(4, 1), frame(3, 0)], &ws)
            .await
            .unwrap();

        assert_eq!(artifact.path, ws.artifact_path());
        assert!(artifact.path.is_file());
        assert!(!artifact.bytes.is_empty());
    }

    #[tokio::test]
    async fn test_encoder_failure_maps_to_encode_failed() {
        struct BrokenEncoder;
        impl FrameEncoder for BrokenEncoder {
            fn compose(&self, _frames: &[Frame], _delay: u32) -> Result<Vec<u8>, String> {
                Err("boom".into())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::create(dir.path(), Uuid::new_v4()).await.unwrap();
        let composer = AnimationComposer::new(Arc::new(BrokenEncoder), 300);
        let err = composer.compose(&[], &ws).await.unwrap_err();
        assert!(matches!(err, RunError::EncodeFailed(_)));
    }
}
