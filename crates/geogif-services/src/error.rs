//! Transport-level failures of the external collaborators
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("HTTP/{0}")]
    Http(#[from] reqwest::Error),

    #[error("STATUS/{service} returned {code}")]
    Status { service: &'static str, code: u16 },

    #[error("DECODE/{service}: {reason}")]
    Decode {
        service: &'static str,
        reason: String,
    },
}

impl ServiceError {
    /// Fold a non-success response into a `Status` error.
    pub fn from_code(service: &'static str, code: u16) -> Self {
        Self::Status { service, code }
    }
}
