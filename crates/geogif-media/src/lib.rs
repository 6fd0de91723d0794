//! Geogif Media: workspace, tile acquisition, animation composition
//!
//! Everything that touches the per-run scratch directory: tiles land in it
//! as they download, the composed animation is written next to them, and
//! the whole directory is removed at run end on both exit paths.

pub mod acquirer;
pub mod composer;
pub mod workspace;

pub use acquirer::{ImageAcquirer, DEFAULT_FETCH_CONCURRENCY};
pub use composer::{AnimationComposer, FrameEncoder, GifComposer, DEFAULT_FRAME_DELAY_MS};
pub use workspace::Workspace;
