//! Bot configuration from `GEOGIF_*` environment variables
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

use geogif_guard::Blocklist;
use geogif_media::GifComposer;
use geogif_services::{
    GeocodeApiClient, LanguageApiClient, StaticTileClient, StatusApiClient,
};
use geogif_stages::{Collaborators, PipelineConfig};

fn default_query() -> String {
    "a".to_string()
}

fn default_count() -> u32 {
    25
}

fn default_base_zoom() -> u8 {
    3
}

fn default_zoom_levels() -> u8 {
    14
}

fn default_fetch_concurrency() -> usize {
    geogif_media::DEFAULT_FETCH_CONCURRENCY
}

fn default_frame_delay_ms() -> u32 {
    geogif_media::DEFAULT_FRAME_DELAY_MS
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_status_api_url() -> String {
    "https://api.twitter.com/1.1".to_string()
}

fn default_language_api_url() -> String {
    "https://language.googleapis.com".to_string()
}

fn default_geocode_api_url() -> String {
    "https://maps.googleapis.com".to_string()
}

fn default_tile_api_url() -> String {
    "https://api.mapbox.com".to_string()
}

/// Deployment knobs and credentials. Only the API credentials are
/// required; everything else has the bot's historical defaults.
#[derive(Debug, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_query")]
    pub query: String,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default = "default_base_zoom")]
    pub base_zoom: u8,
    #[serde(default = "default_zoom_levels")]
    pub zoom_levels: u8,
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
    #[serde(default = "default_frame_delay_ms")]
    pub frame_delay_ms: u32,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_status_api_url")]
    pub status_api_url: String,
    pub status_api_token: String,
    #[serde(default = "default_language_api_url")]
    pub language_api_url: String,
    pub language_api_key: String,
    #[serde(default = "default_geocode_api_url")]
    pub geocode_api_url: String,
    pub geocode_api_key: String,
    #[serde(default = "default_tile_api_url")]
    pub tile_api_url: String,
    pub tile_api_token: String,

    /// Words removed from the default blocklist, comma-separated.
    #[serde(default)]
    pub blocklist_allow: Vec<String>,
    /// Words added on top of the default blocklist, comma-separated.
    #[serde(default)]
    pub blocklist_deny: Vec<String>,
}

impl BotConfig {
    pub fn load() -> Result<Self, envy::Error> {
        envy::prefixed("GEOGIF_").from_env()
    }

    /// The effective blocklist after deployment overrides.
    pub fn blocklist(&self) -> Blocklist {
        let mut list = Blocklist::new();
        for word in &self.blocklist_deny {
            list.deny(word.clone());
        }
        for word in &self.blocklist_allow {
            list.allow(word);
        }
        list
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::new(self.data_dir.clone());
        config.query = self.query.clone();
        config.count = self.count;
        config.base_zoom = self.base_zoom;
        config.zoom_levels = self.zoom_levels;
        config.fetch_concurrency = self.fetch_concurrency;
        config.frame_delay_ms = self.frame_delay_ms;
        config.blocklist = self.blocklist();
        config
    }

    /// Wire up the real HTTP clients. The status client serves both the
    /// search at the head of the pipeline and the publish at its tail.
    pub fn collaborators(&self) -> Collaborators {
        let status = Arc::new(StatusApiClient::new(
            self.status_api_url.clone(),
            self.status_api_token.clone(),
        ));

        Collaborators {
            text_source: status.clone(),
            entities: Arc::new(LanguageApiClient::new(
                self.language_api_url.clone(),
                self.language_api_key.clone(),
            )),
            geocoder: Arc::new(GeocodeApiClient::new(
                self.geocode_api_url.clone(),
                self.geocode_api_key.clone(),
            )),
            tiles: Arc::new(StaticTileClient::new(
                self.tile_api_url.clone(),
                self.tile_api_token.clone(),
            )),
            encoder: Arc::new(GifComposer),
            publisher: status,
        }
    }
}
