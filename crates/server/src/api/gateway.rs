//! Implementation of SearchApi trait for the server

use async_trait::async_trait;
use bizsearch_core::{
    error::Result, BusinessDocument, Error, RetrievalRequest, ReviewRecord, SearchApi,
    REVIEWS_FIELD,
};
use bizsearch_storage::DocumentEngine;
use std::sync::Arc;
use tracing::debug;

/// Implementation of the SearchApi trait backed by a document engine
pub struct SearchGateway {
    engine: Arc<dyn DocumentEngine>,
}

impl SearchGateway {
    /// Create a new SearchGateway over an already constructed engine
    pub fn new(engine: Arc<dyn DocumentEngine>) -> Self {
        Self { engine }
    }

    /// Whether the underlying engine currently answers
    pub async fn health_check(&self) -> Result<()> {
        self.engine.health_check().await
    }
}

#[async_trait]
impl SearchApi for SearchGateway {
    async fn search(&self, request: &RetrievalRequest) -> Result<Vec<BusinessDocument>> {
        let hits = self.engine.search(request).await?;
        debug!("Engine returned {} hits", hits.len());

        Ok(hits
            .into_iter()
            .take(request.size())
            .map(|hit| BusinessDocument::from_source(&hit.id, hit.source))
            .collect())
    }

    async fn get_reviews(&self, business_id: &str) -> Result<Vec<ReviewRecord>> {
        if business_id.is_empty() {
            return Err(Error::not_found("empty business id"));
        }

        let source = self
            .engine
            .get_document(business_id, &[REVIEWS_FIELD])
            .await?
            .ok_or_else(|| Error::not_found(format!("business '{business_id}'")))?;

        ReviewRecord::list_from_source(business_id, source)
    }
}
