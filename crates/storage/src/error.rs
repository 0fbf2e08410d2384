use bizsearch_core::Error as CoreError;
use thiserror::Error;

/// Storage-specific error types
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Operation timeout after {0}ms")]
    Timeout(u64),

    #[error("Engine unavailable (HTTP {status}): {message}")]
    Unavailable { status: u16, message: String },

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConnectionFailed(_) | StorageError::Unavailable { .. } => {
                CoreError::engine_unavailable(err.to_string())
            }
            StorageError::Timeout(ms) => CoreError::EngineTimeout(ms),
            StorageError::InvalidConfig(msg) => CoreError::config(msg),
            StorageError::BackendError(_) | StorageError::SerializationError(_) => {
                CoreError::engine(err.to_string())
            }
        }
    }
}
