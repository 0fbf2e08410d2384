//! Configuration module for the bizsearch system
//!
//! This module provides configuration structures and loading mechanisms for the
//! bizsearch system. Configuration can be loaded from TOML files and/or environment
//! variables.

mod defaults;
mod engine;
mod loading;


use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use defaults::*;

/// Returns the path to the global configuration file
///
/// The global config is stored at `~/.bizsearch/config.toml`.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".bizsearch").join("config.toml"))
}

/// Main configuration structure for the bizsearch system
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Search engine configuration
    #[serde(default)]
    pub engine: EngineConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Configuration for the document search engine
///
/// # Providers
/// - `elasticsearch` (default): Elasticsearch REST API at `url` or `cloud_id`
/// - `mock`: in-process engine, for tests and local development
#[derive(Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Provider type: "elasticsearch" (default), "mock"
    #[serde(default = "default_engine_provider")]
    pub provider: String,

    /// Base URL of the engine, ignored when `cloud_id` is set
    #[serde(default = "default_engine_url")]
    pub url: String,

    /// Elastic Cloud deployment id (or ELASTIC_CLOUD_ID env var)
    #[serde(default)]
    pub cloud_id: Option<String>,

    /// Basic auth user (or ELASTIC_USER env var)
    #[serde(default)]
    pub username: Option<String>,

    /// Basic auth password (or ELASTIC_PASSWORD env var)
    #[serde(default)]
    pub password: Option<String>,

    /// Index holding the business documents
    #[serde(default = "default_engine_index")]
    pub index: String,

    /// Request timeout in milliseconds, applied to every engine call
    #[serde(default = "default_engine_timeout_ms")]
    pub timeout_ms: u64,
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("provider", &self.provider)
            .field("url", &self.url)
            .field("cloud_id", &self.cloud_id)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***REDACTED***"))
            .field("index", &self.index)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Configuration for REST API server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_server_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Allowed CORS origins (empty = disabled, ["*"] = all origins)
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            provider: default_engine_provider(),
            url: default_engine_url(),
            cloud_id: None,
            username: None,
            password: None,
            index: default_engine_index(),
            timeout_ms: default_engine_timeout_ms(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        let valid_providers = ["elasticsearch", "mock"];
        if !valid_providers.contains(&self.engine.provider.as_str()) {
            return Err(Error::config(format!(
                "Invalid engine provider '{}'. Must be one of: {:?}",
                self.engine.provider, valid_providers
            )));
        }

        if self.engine.index.trim().is_empty() {
            return Err(Error::config("engine.index must not be empty".to_string()));
        }

        if self.engine.timeout_ms == 0 {
            return Err(Error::config(
                "engine.timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.engine.timeout_ms > MAX_ENGINE_TIMEOUT_MS {
            return Err(Error::config(format!(
                "engine.timeout_ms too large (max {MAX_ENGINE_TIMEOUT_MS}, got {})",
                self.engine.timeout_ms
            )));
        }

        if self.engine.provider == "elasticsearch" {
            // Resolving the endpoint also validates the cloud id
            self.engine.endpoint()?;
        }

        if self.engine.username.is_some() != self.engine.password.is_some() {
            return Err(Error::config(
                "engine.username and engine.password must be set together".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(Error::config(
                "server.port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Saves the configuration to a TOML file
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, toml_string)
            .map_err(|e| Error::config(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Create a new ConfigBuilder with defaults for every section
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config with fluent API
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    engine: EngineConfig,
    server: ServerConfig,
}

impl ConfigBuilder {
    /// Set the engine configuration
    pub fn engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Set the server configuration
    pub fn server(mut self, server: ServerConfig) -> Self {
        self.server = server;
        self
    }

    /// Build the Config
    pub fn build(self) -> Config {
        Config {
            engine: self.engine,
            server: self.server,
        }
    }
}
