//! Unified Error Model
//!
//! Every variant is an ordinary run failure: the pipeline aborts, cleanup
//! runs, and the next scheduled invocation starts fresh. Nothing here is
//! retried automatically.
use thiserror::Error;

/// Which half of the two-step publish contract failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStep {
    UploadMedia,
    PostStatus,
}

impl std::fmt::Display for PublishStep {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::UploadMedia => write!(f, "upload-media"),
            Self::PostStatus => write!(f, "post-status"),
        }
    }
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error("EXTRACT/no place candidates in batch")]
    NoCandidatesFound,

    #[error("FILTER/all candidates rejected")]
    AllCandidatesRejected,

    #[error("RESOLVE/no coordinates found ({tried} candidates tried)")]
    NoCoordinatesFound { tried: usize },

    #[error("ACQUIRE/tile fetch failed at zoom {zoom}: {reason}")]
    ImageFetchFailed { zoom: u8, reason: String },

    #[error("COMPOSE/{0}")]
    EncodeFailed(String),

    #[error("GUARD/status text blocked on {word:?}")]
    ContentBlocked { word: String },

    #[error("PUBLISH/{step}: {reason}")]
    PublishFailed { step: PublishStep, reason: String },

    #[error("LEDGER/{0}")]
    LedgerIOFailed(String),

    #[error("WORKSPACE/{0}")]
    WorkspaceIOFailed(String),

    #[error("SERVICE/{service}: {reason}")]
    Service {
        service: &'static str,
        reason: String,
    },
}

impl RunError {
    /// Stable failure kind, used for log records and exit reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoCandidatesFound => "no_candidates_found",
            Self::AllCandidatesRejected => "all_candidates_rejected",
            Self::NoCoordinatesFound { .. } => "no_coordinates_found",
            Self::ImageFetchFailed { .. } => "image_fetch_failed",
            Self::EncodeFailed(_) => "encode_failed",
            Self::ContentBlocked { .. } => "content_blocked",
            Self::PublishFailed { .. } => "publish_failed",
            Self::LedgerIOFailed(_) => "ledger_io_failed",
            Self::WorkspaceIOFailed(_) => "workspace_io_failed",
            Self::Service { .. } => "service_failed",
        }
    }
}
