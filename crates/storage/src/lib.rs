#![deny(warnings)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod error;
mod factory;
mod mock;

mod elasticsearch;

// Export factory functions
pub use elasticsearch::{ElasticsearchEngine, ElasticsearchEngineBuilder};
pub use factory::{create_and_verify_engine, create_document_engine};
pub use mock::InMemoryEngine;

use async_trait::async_trait;
use bizsearch_core::{Error, RetrievalRequest};
use serde_json::{Map, Value};

// ==== Traits ====

/// Read-only access to the document search engine holding business records
///
/// Implementations are shared by all in-flight requests and must be safe for
/// concurrent use.
#[async_trait]
pub trait DocumentEngine: Send + Sync {
    /// Run a compiled request, returning hits in descending score order
    ///
    /// Each hit's source is already restricted to the request's projection.
    async fn search(&self, request: &RetrievalRequest) -> Result<Vec<SearchHit>, Error>;

    /// Fetch one document by id, restricted to `fields` (all fields when empty)
    ///
    /// Returns `Ok(None)` when no document has this id.
    async fn get_document(
        &self,
        id: &str,
        fields: &[&str],
    ) -> Result<Option<Map<String, Value>>, Error>;

    /// Verify the engine is reachable
    async fn health_check(&self) -> Result<(), Error>;
}

// ==== Models ====

/// A single search hit as returned by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Engine document id
    pub id: String,
    /// Engine relevance score, when reported
    pub score: Option<f64>,
    /// Projected source fields
    pub source: Map<String, Value>,
}
