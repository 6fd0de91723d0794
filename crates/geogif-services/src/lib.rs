//! Geogif Services: external collaborator contracts and HTTP clients
//!
//! The pipeline composes five independent, fallible services. This crate
//! owns their trait boundaries and the reqwest clients that speak to the
//! real endpoints; stages depend only on the traits so tests can swap in
//! canned collaborators.
//!
//! ```text
//! TextSource ─→ EntityService ─→ GeocodeService ─→ TileProvider ─→ PublishService
//!   (posts)       (places)         (lat/lng)        (tiles)        (media+status)
//! ```

pub mod contracts;
pub mod error;
pub mod geocode_api;
pub mod language_api;
pub mod status_api;
pub mod tiles;

pub use contracts::{
    Entity, EntityKind, EntityService, GeocodeService, PublishService, TextSource, TileProvider,
};
pub use error::ServiceError;
pub use geocode_api::GeocodeApiClient;
pub use language_api::LanguageApiClient;
pub use status_api::StatusApiClient;
pub use tiles::StaticTileClient;
