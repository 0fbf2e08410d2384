//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, Environment, File};
use std::path::Path;

use super::{global_config_path, Config};

/// Environment variables understood by the upstream deployment, mapped to config keys
const LEGACY_ENGINE_ENV: [(&str, &str); 4] = [
    ("ELASTIC_CLOUD_ID", "engine.cloud_id"),
    ("ELASTIC_USER", "engine.username"),
    ("ELASTIC_PASSWORD", "engine.password"),
    ("ELASTIC_URL", "engine.url"),
];

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `BIZSEARCH_` and use double underscores
    /// for nested values. For example:
    /// - `BIZSEARCH_ENGINE__INDEX=business`
    ///
    /// The `ELASTIC_*` variables of the legacy deployment take precedence over both.
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut builder = ConfigLib::builder();

        // Add the config file if it exists
        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        // Add environment variables with BIZSEARCH_ prefix
        builder = builder.add_source(
            Environment::with_prefix("BIZSEARCH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        for (var, key) in LEGACY_ENGINE_ENV {
            if let Ok(value) = std::env::var(var) {
                if value.is_empty() {
                    continue;
                }
                builder = builder
                    .set_override(key, value)
                    .map_err(|e| Error::config(format!("Failed to set {var}: {e}")))?;
            }
        }

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from a single file
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file (~/.bizsearch/config.toml or custom --config path)
    /// 3. Environment variables (BIZSEARCH_*)
    /// 4. Upstream environment variables (ELASTIC_CLOUD_ID, ELASTIC_USER, ...)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => global_config_path()?,
        };
        tracing::debug!("Loading configuration from {}", path.display());
        Self::from_file(&path)
    }
}
