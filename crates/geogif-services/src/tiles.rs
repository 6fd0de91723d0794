//! Static tile client: satellite imagery at a fixed pixel size
use async_trait::async_trait;
use tracing::debug;

use crate::contracts::TileProvider;
use crate::error::ServiceError;

/// Satellite style path on the static-image API.
const STYLE_PATH: &str = "styles/v1/mapbox/satellite-v9/static";

/// Frame dimensions; every zoom level is fetched at the same size so the
/// composed animation doesn't jitter.
const TILE_SIZE: &str = "600x600";

pub struct StaticTileClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl StaticTileClient {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    fn tile_url(&self, lat: f64, lng: f64, zoom: u8) -> String {
        // Longitude first: the static API takes {lng},{lat},{zoom}.
        format!(
            "{}/{}/{},{},{}/{}",
            self.base_url, STYLE_PATH, lng, lat, zoom, TILE_SIZE
        )
    }
}

#[async_trait]
impl TileProvider for StaticTileClient {
    async fn fetch(&self, lat: f64, lng: f64, zoom: u8) -> Result<Vec<u8>, ServiceError> {
        let url = self.tile_url(lat, lng, zoom);
        let resp = self
            .http
            .get(&url)
            .query(&[("access_token", self.access_token.as_str())])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ServiceError::from_code("tiles", resp.status().as_u16()));
        }

        let bytes = resp.bytes().await?.to_vec();
        debug!(zoom, size = bytes.len(), "tile fetched");
        Ok(bytes)
    }
}
