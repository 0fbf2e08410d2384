use super::client::ElasticsearchEngine;
use crate::error::StorageError;
use bizsearch_core::{config::EngineConfig, Error};
use reqwest::{Client, Url};
use std::time::Duration;

/// Builder for ElasticsearchEngine
pub struct ElasticsearchEngineBuilder {
    config: EngineConfig,
}

impl ElasticsearchEngineBuilder {
    /// Create a new builder with the given configuration
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Set the base URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.config.url = url.into();
        self.config.cloud_id = None;
        self
    }

    /// Set basic auth credentials
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.username = Some(username.into());
        self.config.password = Some(password.into());
        self
    }

    /// Set the index name
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.config.index = index.into();
        self
    }

    /// Set the timeout in milliseconds
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeout_ms = ms;
        self
    }

    /// Build the client; no request is sent until first use
    pub fn build(self) -> Result<ElasticsearchEngine, Error> {
        let endpoint = self.config.endpoint()?;
        let base_url = Url::parse(&endpoint).map_err(|e| {
            StorageError::InvalidConfig(format!("Invalid engine URL '{endpoint}': {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(StorageError::InvalidConfig(format!(
                "Engine URL '{endpoint}' cannot be used as a base URL"
            ))
            .into());
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(self.config.timeout_ms))
            .build()
            .map_err(|e| {
                StorageError::InvalidConfig(format!("Failed to create HTTP client: {e}"))
            })?;

        let credentials = match (self.config.username, self.config.password) {
            (Some(username), Some(password)) => Some((username, password)),
            _ => None,
        };

        tracing::info!(
            "Elasticsearch engine at {} (index '{}', timeout {}ms)",
            base_url,
            self.config.index,
            self.config.timeout_ms
        );

        Ok(ElasticsearchEngine::new(
            client,
            base_url,
            self.config.index,
            self.config.timeout_ms,
            credentials,
        ))
    }
}
