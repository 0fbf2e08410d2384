//! Elasticsearch document engine over the REST API

use super::dsl;
use crate::error::StorageError;
use crate::{DocumentEngine, SearchHit};
use async_trait::async_trait;
use bizsearch_core::{Error, RetrievalRequest};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// `_search` response, reduced to what the gateway reads
#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score")]
    score: Option<f64>,
    #[serde(rename = "_source")]
    source: Option<Map<String, Value>>,
}

/// `_doc/{id}` response
#[derive(Debug, Deserialize)]
struct GetResponse {
    #[serde(default)]
    found: bool,
    #[serde(rename = "_source")]
    source: Option<Map<String, Value>>,
}

/// Elasticsearch client holding one pooled HTTP connection set
pub struct ElasticsearchEngine {
    client: Client,
    base_url: Url,
    index: String,
    timeout_ms: u64,
    credentials: Option<(String, String)>,
}

impl ElasticsearchEngine {
    pub(crate) fn new(
        client: Client,
        base_url: Url,
        index: String,
        timeout_ms: u64,
        credentials: Option<(String, String)>,
    ) -> Self {
        Self {
            client,
            base_url,
            index,
            timeout_ms,
            credentials,
        }
    }

    /// `{base}/{index}/{segments...}` with every segment percent-encoded
    fn index_url(&self, segments: &[&str]) -> Result<Url, StorageError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                StorageError::InvalidConfig(format!("Engine URL {} is not a base", self.base_url))
            })?
            .pop_if_empty()
            .push(&self.index)
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StorageError> {
        let request = match &self.credentials {
            Some((username, password)) => request.basic_auth(username, Some(password)),
            None => request,
        };
        request.send().await.map_err(|e| self.transport_error(e))
    }

    fn transport_error(&self, e: reqwest::Error) -> StorageError {
        if e.is_timeout() {
            warn!("Elasticsearch request timed out after {}ms", self.timeout_ms);
            StorageError::Timeout(self.timeout_ms)
        } else if e.is_connect() {
            warn!("Elasticsearch connection failed: {e}");
            StorageError::ConnectionFailed(e.to_string())
        } else if e.is_decode() {
            StorageError::SerializationError(e.to_string())
        } else {
            StorageError::BackendError(e.to_string())
        }
    }

    async fn status_error(response: Response) -> StorageError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        warn!("Elasticsearch returned {status}: {body}");

        if status.is_server_error() {
            StorageError::Unavailable {
                status: status.as_u16(),
                message: body,
            }
        } else {
            StorageError::BackendError(format!("{status}: {body}"))
        }
    }
}

#[async_trait]
impl DocumentEngine for ElasticsearchEngine {
    async fn search(&self, request: &RetrievalRequest) -> Result<Vec<SearchHit>, Error> {
        let url = self.index_url(&["_search"])?;
        let body = dsl::search_body(request);
        debug!("Elasticsearch search: {body}");

        let response = self.send(self.client.post(url).json(&body)).await?;
        if !response.status().is_success() {
            return Err(Self::status_error(response).await.into());
        }

        let parsed: SearchResponse = response.json().await.map_err(|e| self.transport_error(e))?;

        Ok(parsed
            .hits
            .hits
            .into_iter()
            .map(|hit| SearchHit {
                id: hit.id,
                score: hit.score,
                source: hit.source.unwrap_or_default(),
            })
            .collect())
    }

    async fn get_document(
        &self,
        id: &str,
        fields: &[&str],
    ) -> Result<Option<Map<String, Value>>, Error> {
        let mut url = self.index_url(&["_doc", id])?;
        if !fields.is_empty() {
            url.query_pairs_mut()
                .append_pair("_source_includes", &fields.join(","));
        }

        let response = self.send(self.client.get(url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("Elasticsearch has no document '{id}'");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::status_error(response).await.into());
        }

        let parsed: GetResponse = response.json().await.map_err(|e| self.transport_error(e))?;
        if !parsed.found {
            return Ok(None);
        }

        Ok(Some(parsed.source.unwrap_or_default()))
    }

    async fn health_check(&self) -> Result<(), Error> {
        let response = self.send(self.client.get(self.base_url.clone())).await?;
        if !response.status().is_success() {
            return Err(Self::status_error(response).await.into());
        }
        Ok(())
    }
}
