//! Error types for the client.

use thiserror::Error;

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The statement could not be built. Nothing was sent.
    #[error("query build error: {0}")]
    Build(#[from] chsql_core::Error),

    /// The executor failed to run a statement.
    #[error("executor error: {0}")]
    Executor(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ClientError {
    /// Wraps an executor error.
    pub fn executor<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Executor(Box::new(error))
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
