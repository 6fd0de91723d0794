//! Collaborator Contracts
//!
//! One trait per external service the pipeline consumes. Everything is
//! awaited; nothing is fire-and-forget. Timeouts are each client's own
//! business and surface as ordinary `ServiceError`s.
use async_trait::async_trait;

use geogif_core::{Coordinates, PublishReceipt};

use crate::error::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Place,
    Other,
}

/// A named entity detected in the cleaned text batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Source of the raw post batch.
#[async_trait]
pub trait TextSource: Send + Sync {
    /// Most recent posts matching `query`, newest-first as the service
    /// returns them.
    async fn search(&self, query: &str, count: u32) -> Result<Vec<String>, ServiceError>;
}

/// Named-entity extraction over the cleaned batch text.
#[async_trait]
pub trait EntityService: Send + Sync {
    async fn detect_places(&self, text: &str) -> Result<Vec<Entity>, ServiceError>;
}

/// Forward geocoding. Zero-or-one result: an address the service cannot
/// place resolves to `None`, which is not an error.
#[async_trait]
pub trait GeocodeService: Send + Sync {
    async fn resolve(&self, address: &str) -> Result<Option<Coordinates>, ServiceError>;
}

/// Static map tile imagery at a given zoom.
#[async_trait]
pub trait TileProvider: Send + Sync {
    async fn fetch(&self, lat: f64, lng: f64, zoom: u8) -> Result<Vec<u8>, ServiceError>;
}

/// Two-step publish contract: upload the media, then post the status bound
/// to it. No retry on either step.
#[async_trait]
pub trait PublishService: Send + Sync {
    async fn upload_media(&self, bytes: &[u8]) -> Result<String, ServiceError>;

    async fn publish(&self, text: &str, media_id: &str)
        -> Result<PublishReceipt, ServiceError>;
}
