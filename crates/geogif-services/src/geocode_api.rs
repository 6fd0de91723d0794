//! Geocode API client: address → zero-or-one coordinate pair
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use geogif_core::Coordinates;

use crate::contracts::GeocodeService;
use crate::error::ServiceError;

pub struct GeocodeApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeocodeApiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    // Zero-result lookups come back as HTTP 200 with an empty array.
    #[serde(default)]
    results: Vec<GeocodeHit>,
}

#[derive(Debug, Deserialize)]
struct GeocodeHit {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

#[async_trait]
impl GeocodeService for GeocodeApiClient {
    async fn resolve(&self, address: &str) -> Result<Option<Coordinates>, ServiceError> {
        let url = format!("{}/maps/api/geocode/json", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ServiceError::from_code("geocode", resp.status().as_u16()));
        }

        let body: GeocodeResponse = resp.json().await?;
        let coords = body.results.into_iter().next().map(|hit| Coordinates {
            lat: hit.geometry.location.lat,
            lng: hit.geometry.location.lng,
        });
        debug!(address, resolved = coords.is_some(), "geocode lookup");
        Ok(coords)
    }
}
