use thiserror::Error;

/// Result type for bizsearch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for bizsearch operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The requested document does not exist in the engine
    #[error("Not found: {0}")]
    NotFound(String),

    /// The search engine could not be reached or reported itself unavailable
    #[error("Search engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The search engine did not answer within the configured timeout
    #[error("Search engine timed out after {0}ms")]
    EngineTimeout(u64),

    /// The search engine answered, but not with something usable
    #[error("Search engine error: {0}")]
    Engine(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Creates an engine-unavailable error
    pub fn engine_unavailable(msg: impl Into<String>) -> Self {
        Self::EngineUnavailable(msg.into())
    }

    /// Creates a generic engine error
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    /// Creates an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// True for failures that originate in the search engine rather than the caller
    pub fn is_engine_failure(&self) -> bool {
        matches!(
            self,
            Self::EngineUnavailable(_) | Self::EngineTimeout(_) | Self::Engine(_)
        )
    }
}
