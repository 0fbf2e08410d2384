//! Search API trait definition
//!
//! This trait defines the interface for the search gateway.
//! Implementations can be found in the server crate.

use crate::business::{BusinessDocument, ReviewRecord};
use crate::error::Result;
use crate::query_compiler::RetrievalRequest;
use async_trait::async_trait;

/// Trait defining search gateway operations
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Execute a compiled request, returning projections in descending score order
    async fn search(&self, request: &RetrievalRequest) -> Result<Vec<BusinessDocument>>;

    /// Fetch the reviews embedded in one business record
    ///
    /// Fails with [`crate::Error::NotFound`] when the business does not exist.
    async fn get_reviews(&self, business_id: &str) -> Result<Vec<ReviewRecord>>;
}
