//! Language API client: named-entity detection over the cleaned batch
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::contracts::{Entity, EntityKind, EntityService};
use crate::error::ServiceError;

/// The entity type string the language API uses for real-world places.
const LOCATION_TYPE: &str = "LOCATION";

pub struct LanguageApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl LanguageApiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    entities: Vec<ApiEntity>,
}

#[derive(Debug, Deserialize)]
struct ApiEntity {
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

impl ApiEntity {
    fn into_entity(self) -> Entity {
        let kind = if self.kind == LOCATION_TYPE {
            EntityKind::Place
        } else {
            EntityKind::Other
        };
        Entity::new(self.name, kind)
    }
}

#[async_trait]
impl EntityService for LanguageApiClient {
    async fn detect_places(&self, text: &str) -> Result<Vec<Entity>, ServiceError> {
        let url = format!("{}/v1/documents:analyzeEntities", self.base_url);
        let resp = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "document": {
                    "type": "PLAIN_TEXT",
                    "content": text,
                },
                "encodingType": "NONE",
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ServiceError::from_code("language", resp.status().as_u16()));
        }

        let body: AnalyzeResponse = resp.json().await?;
        debug!(entities = body.entities.len(), "entities detected");
        Ok(body.entities.into_iter().map(ApiEntity::into_entity).collect())
    }
}
