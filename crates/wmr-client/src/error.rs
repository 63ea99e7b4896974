//! Client error types.

use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Input rejected before any network call was made.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Upload failed; no job exists, nothing to roll back.
    #[error("Submission failed: {0}")]
    Submission(String),

    /// A status query failed; the polling loop stops.
    #[error("Status check failed: {0}")]
    Polling(String),

    /// The result fetch failed after completion was reported.
    #[error("Result download failed: {0}")]
    Download(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
