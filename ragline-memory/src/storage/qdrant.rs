//! Qdrant backend over the REST API

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use super::{BackendInfo, BackendKind, StoreConfig, VectorBackend};
use crate::document::{Document, DocumentId};
use crate::error::{MemoryError, Result};

#[derive(Debug, Serialize)]
struct CreateCollection {
    vectors: VectorParams,
}

#[derive(Debug, Serialize)]
struct VectorParams {
    size: usize,
    distance: &'static str,
}

#[derive(Debug, Serialize)]
struct UpsertPoints<'a> {
    points: [Point<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Point<'a> {
    id: DocumentId,
    vector: &'a [f32],
    payload: Payload<'a>,
}

#[derive(Debug, Serialize)]
struct Payload<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct SearchPoints<'a> {
    vector: &'a [f32],
    limit: usize,
    with_payload: bool,
}

#[derive(Debug, Serialize)]
struct CountPoints {
    exact: bool,
}

/// Qdrant wraps every answer in `{"result": ..., "status": ..., "time": ...}`
#[derive(Debug, Deserialize)]
struct QdrantResponse<T> {
    result: T,
}

#[derive(Debug, Deserialize)]
struct ScoredPoint {
    #[serde(default)]
    payload: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct CountResult {
    count: usize,
}

/// Primary backend: a Qdrant collection with cosine distance
pub struct QdrantBackend {
    client: Client,
    base_url: Url,
    collection: String,
    dimension: usize,
}

impl QdrantBackend {
    /// Build a client without touching the network
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let base_url = Url::parse(&config.url).map_err(|e| {
            MemoryError::configuration(format!("invalid Qdrant URL '{}': {}", config.url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(MemoryError::configuration(format!(
                "Qdrant URL cannot be a base: {}",
                config.url
            )));
        }

        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key).map_err(|e| {
                MemoryError::configuration(format!("invalid Qdrant API key: {}", e))
            })?;
            headers.insert("api-key", value);
        }

        let client = Client::builder()
            .user_agent(concat!("ragline/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            collection: config.collection.clone(),
            dimension: config.dimension,
        })
    }

    /// Connect and recreate the collection
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let backend = Self::new(config)?;
        backend.recreate_collection().await?;
        Ok(backend)
    }

    /// Drop the collection if present, then create it empty
    async fn recreate_collection(&self) -> Result<()> {
        let url = self.endpoint(&[])?;

        let response = self.client.delete(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(MemoryError::backend(format!(
                "failed to drop collection '{}': HTTP {}",
                self.collection, status
            )));
        }

        let body = CreateCollection {
            vectors: VectorParams {
                size: self.dimension,
                distance: "Cosine",
            },
        };
        self.client
            .put(url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        log::debug!(
            "Recreated collection '{}' ({}d, cosine)",
            self.collection,
            self.dimension
        );
        Ok(())
    }

    /// `{base}/collections/{collection}/{segments...}`
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MemoryError::configuration("Qdrant URL cannot be a base"))?
            .pop_if_empty()
            .push("collections")
            .push(&self.collection)
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl VectorBackend for QdrantBackend {
    fn describe(&self) -> BackendInfo {
        BackendInfo {
            storage_type: BackendKind::Qdrant,
            url: Some(self.base_url.to_string()),
            collection: Some(self.collection.clone()),
        }
    }

    async fn upsert(&self, document: Document) -> Result<()> {
        let mut url = self.endpoint(&["points"])?;
        url.query_pairs_mut().append_pair("wait", "true");

        let body = UpsertPoints {
            points: [Point {
                id: document.id,
                vector: &document.vector,
                payload: Payload {
                    text: &document.text,
                },
            }],
        };
        self.client
            .put(url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<String>> {
        let url = self.endpoint(&["points", "search"])?;
        let body = SearchPoints {
            vector: query,
            limit,
            with_payload: true,
        };

        let response: QdrantResponse<Vec<ScoredPoint>> = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(texts_from_hits(response.result))
    }

    async fn document_count(&self) -> Result<usize> {
        let url = self.endpoint(&["points", "count"])?;
        let response: QdrantResponse<CountResult> = self
            .client
            .post(url)
            .json(&CountPoints { exact: true })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.result.count)
    }
}

/// Hit texts in ranked order; hits without a text payload are skipped
fn texts_from_hits(hits: Vec<ScoredPoint>) -> Vec<String> {
    hits.into_iter()
        .filter_map(|hit| {
            hit.payload?
                .get("text")
                .and_then(|text| text.as_str())
                .map(str::to_string)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn backend(url: &str) -> QdrantBackend {
        QdrantBackend::new(&StoreConfig::new(url, "demo_collection", 8)).unwrap()
    }

    #[test]
    fn test_endpoint_paths() {
        let backend = backend("http://localhost:6333");
        assert_eq!(
            backend.endpoint(&[]).unwrap().as_str(),
            "http://localhost:6333/collections/demo_collection"
        );
        assert_eq!(
            backend.endpoint(&["points", "search"]).unwrap().as_str(),
            "http://localhost:6333/collections/demo_collection/points/search"
        );
    }

    #[test]
    fn test_endpoint_keeps_path_prefix() {
        let backend = backend("https://vectors.example.com/qdrant/");
        assert_eq!(
            backend.endpoint(&["points"]).unwrap().as_str(),
            "https://vectors.example.com/qdrant/collections/demo_collection/points"
        );
    }

    #[test]
    fn test_invalid_url_is_configuration_error() {
        let result = QdrantBackend::new(&StoreConfig::new("localhost:6333 nope", "c", 8));
        assert!(matches!(result, Err(MemoryError::Configuration(_))));

        let result = QdrantBackend::new(&StoreConfig::new("mailto:ops@example.com", "c", 8));
        assert!(matches!(result, Err(MemoryError::Configuration(_))));
    }

    #[test]
    fn test_invalid_api_key_is_configuration_error() {
        let config = StoreConfig::new("http://localhost:6333", "c", 8).with_api_key("bad\nkey");
        assert!(matches!(
            QdrantBackend::new(&config),
            Err(MemoryError::Configuration(_))
        ));
    }

    #[test]
    fn test_describe() {
        let info = backend("http://localhost:6333").describe();
        assert_eq!(info.storage_type, BackendKind::Qdrant);
        assert_eq!(info.url.as_deref(), Some("http://localhost:6333/"));
        assert_eq!(info.collection.as_deref(), Some("demo_collection"));
    }

    #[test]
    fn test_request_bodies() {
        let body = CreateCollection {
            vectors: VectorParams {
                size: 128,
                distance: "Cosine",
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"vectors": {"size": 128, "distance": "Cosine"}})
        );

        let vector = [0.25_f32, 0.5];
        let body = UpsertPoints {
            points: [Point {
                id: 3,
                vector: &vector,
                payload: Payload { text: "hello" },
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "points": [{"id": 3, "vector": [0.25, 0.5], "payload": {"text": "hello"}}]
            })
        );
    }

    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "result": [
                {"id": 1, "version": 0, "score": 0.91, "payload": {"text": "best"}},
                {"id": 2, "version": 0, "score": 0.40},
                {"id": 0, "version": 0, "score": 0.12, "payload": {"text": "worst"}}
            ],
            "status": "ok",
            "time": 0.0003
        }"#;
        let response: QdrantResponse<Vec<ScoredPoint>> = serde_json::from_str(json).unwrap();
        assert_eq!(
            texts_from_hits(response.result),
            vec!["best".to_string(), "worst".to_string()]
        );
    }

    #[test]
    fn test_parse_count_response() {
        let json = r#"{"result": {"count": 42}, "status": "ok", "time": 0.0001}"#;
        let response: QdrantResponse<CountResult> = serde_json::from_str(json).unwrap();
        assert_eq!(response.result.count, 42);
    }

    #[tokio::test]
    async fn test_connect_unreachable_fails() {
        let config = StoreConfig::new("http://127.0.0.1:9", "c", 8)
            .with_timeout(Duration::from_millis(500));
        let result = QdrantBackend::connect(&config).await;
        assert!(matches!(result, Err(MemoryError::Http(_))));
    }
}
