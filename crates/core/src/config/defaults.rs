//! Default values and functions for configuration

// Default constants
pub(crate) const DEFAULT_ENGINE_PROVIDER: &str = "elasticsearch";
pub(crate) const DEFAULT_ENGINE_URL: &str = "http://localhost:9200";
pub(crate) const DEFAULT_ENGINE_INDEX: &str = "business";
pub(crate) const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Upper bound accepted for `engine.timeout_ms`
pub(crate) const MAX_ENGINE_TIMEOUT_MS: u64 = 600_000;

pub(crate) fn default_engine_provider() -> String {
    DEFAULT_ENGINE_PROVIDER.to_string()
}

pub(crate) fn default_engine_url() -> String {
    DEFAULT_ENGINE_URL.to_string()
}

pub(crate) fn default_engine_index() -> String {
    DEFAULT_ENGINE_INDEX.to_string()
}

pub(crate) fn default_engine_timeout_ms() -> u64 {
    2000
}

pub(crate) fn default_server_host() -> String {
    DEFAULT_SERVER_HOST.to_string()
}

pub(crate) fn default_server_port() -> u16 {
    5000
}

pub(crate) fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()] // Public API: any origin may read responses
}
