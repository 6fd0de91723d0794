//! Status API client: recent-post search and the two-step media publish
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use geogif_core::PublishReceipt;

use crate::contracts::{PublishService, TextSource};
use crate::error::ServiceError;

/// Timestamp format the status API emits (ex: "Wed Oct 10 20:19:24 +0000 2018").
const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Client for the status service's v1.1-style REST surface. Serves both
/// ends of the pipeline: the search that feeds the extractor and the
/// upload+publish pair at the tail.
pub struct StatusApiClient {
    http: reqwest::Client,
    base_url: String,
    bearer_token: String,
}

impl StatusApiClient {
    pub fn new(base_url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token: bearer_token.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    statuses: Vec<SearchStatus>,
}

#[derive(Debug, Deserialize)]
struct SearchStatus {
    text: String,
}

#[derive(Debug, Deserialize)]
struct MediaUploadResponse {
    media_id_string: String,
}

#[derive(Debug, Deserialize)]
struct StatusUpdateResponse {
    id_str: String,
    created_at: String,
}

#[async_trait]
impl TextSource for StatusApiClient {
    async fn search(&self, query: &str, count: u32) -> Result<Vec<String>, ServiceError> {
        let url = format!("{}/search/tweets.json", self.base_url);
        let count = count.to_string();
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .query(&[
                ("q", query),
                ("count", count.as_str()),
                ("result_type", "recent"),
                ("lang", "en"),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ServiceError::from_code("status-search", resp.status().as_u16()));
        }

        let body: SearchResponse = resp.json().await?;
        debug!(posts = body.statuses.len(), "retrieved post batch");
        Ok(body.statuses.into_iter().map(|s| s.text).collect())
    }
}

#[async_trait]
impl PublishService for StatusApiClient {
    async fn upload_media(&self, bytes: &[u8]) -> Result<String, ServiceError> {
        let url = format!("{}/media/upload.json", self.base_url);
        let media_data = BASE64.encode(bytes);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.bearer_token)
            .form(&[("media_data", media_data.as_str())])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ServiceError::from_code("media-upload", resp.status().as_u16()));
        }

        let body: MediaUploadResponse = resp.json().await?;
        debug!(media_id = %body.media_id_string, "media uploaded");
        Ok(body.media_id_string)
    }

    async fn publish(
        &self,
        text: &str,
        media_id: &str,
    ) -> Result<PublishReceipt, ServiceError> {
        let url = format!("{}/statuses/update.json", self.base_url);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.bearer_token)
            .form(&[("status", text), ("media_ids", media_id)])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ServiceError::from_code("status-update", resp.status().as_u16()));
        }

        let body: StatusUpdateResponse = resp.json().await?;
        let posted_at = DateTime::parse_from_str(&body.created_at, CREATED_AT_FORMAT)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(PublishReceipt {
            id: body.id_str,
            posted_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_shape() {
        let body: SearchResponse = serde_json::from_str(
            r#"{"statuses": [{"text": "went to Paris"}, {"text": "RT nice"}]}"#,
        )
        .unwrap();
        assert_eq!(body.statuses.len(), 2);
        assert_eq!(body.statuses[0].text, "went to Paris");
    }

    #[test]
    fn test_search_response_missing_statuses() {
        let body: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(body.statuses.is_empty());
    }

    #[test]
    fn test_created_at_format() {
        let parsed = DateTime::parse_from_str("Wed Oct 10 20:19:24 +0000 2018", CREATED_AT_FORMAT);
        assert!(parsed.is_ok());
    }

    #[test]
    fn test_update_response_shape() {
        let body: StatusUpdateResponse = serde_json::from_str(
            r#"{"id_str": "1050118621198921728", "created_at": "Wed Oct 10 20:19:24 +0000 2018", "extra": 1}"#,
        )
        .unwrap();
        assert_eq!(body.id_str, "1050118621198921728");
    }
}
