use thiserror::Error;

/// Failures talking to the directory server, tagged by the phase that failed.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Directory timed out: {0}")]
    Timeout(String),

    #[error("Bind failed: {0}")]
    AuthenticationError(String),

    #[error("Search failed: {0}")]
    SearchError(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
