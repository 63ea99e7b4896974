//! Service request/response types.

use serde::{Deserialize, Serialize};

use wmr_models::RemoteStatus;

/// Response from a successful submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// Server-issued job id
    pub job_id: String,
}

/// Response from a status query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Progress percentage (0-100)
    #[serde(default)]
    pub progress: f64,
    /// Current processing status
    pub status: RemoteStatus,
    /// Error detail when the job failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
