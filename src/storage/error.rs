use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Background write failed: {0}")]
    Background(#[from] tokio::task::JoinError),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
