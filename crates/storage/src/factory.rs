use crate::elasticsearch::ElasticsearchEngineBuilder;
use crate::{mock::InMemoryEngine, DocumentEngine};
use bizsearch_core::{config::EngineConfig, Error};
use std::sync::Arc;

/// Creates a document engine based on configuration.
///
/// This is the primary factory function for creating engines. It returns a
/// trait object that hides implementation details, so the gateway works the
/// same against Elasticsearch or the in-memory engine.
///
/// # Arguments
/// * `config` - Engine configuration specifying provider type and connection details
///
/// # Errors
/// Returns an error if the provider is unknown or the endpoint cannot be resolved
///
/// # Example
/// ```ignore
/// let engine = create_document_engine(&EngineConfig::default())?;
/// let hits = engine.search(&compile("pizza", None)).await?;
/// ```
pub fn create_document_engine(config: &EngineConfig) -> Result<Arc<dyn DocumentEngine>, Error> {
    match config.provider.as_str() {
        "elasticsearch" => {
            let engine = ElasticsearchEngineBuilder::from_config(config.clone()).build()?;
            Ok(Arc::new(engine) as Arc<dyn DocumentEngine>)
        }
        "mock" => Ok(Arc::new(InMemoryEngine::new()) as Arc<dyn DocumentEngine>),
        other => Err(Error::config(format!(
            "Unknown engine provider '{other}'"
        ))),
    }
}

/// Creates a document engine and verifies it is reachable.
///
/// Equivalent to calling `create_document_engine()` followed by `health_check()`.
///
/// # Errors
/// Returns an error if the engine cannot be created or does not answer
pub async fn create_and_verify_engine(
    config: &EngineConfig,
) -> Result<Arc<dyn DocumentEngine>, Error> {
    let engine = create_document_engine(config)?;
    engine.health_check().await?;
    Ok(engine)
}
