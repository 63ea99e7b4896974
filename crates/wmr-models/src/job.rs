//! Job identity and client-side lifecycle.

use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Opaque server-issued job identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Processing status as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RemoteStatus {
    /// Still being processed
    Processing,
    /// Result is ready for download
    Completed,
    /// Processing failed
    Failed,
}

impl RemoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteStatus::Processing => "processing",
            RemoteStatus::Completed => "completed",
            RemoteStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, RemoteStatus::Completed | RemoteStatus::Failed)
    }
}

impl fmt::Display for RemoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Client-side lifecycle phase of a job.
///
/// `Uploading` precedes job creation (no id exists yet); a job object is
/// created in `Polling` and only the polling loop moves it forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobPhase {
    /// No job in flight
    #[default]
    Idle,
    /// Submission request in progress
    Uploading,
    /// Waiting on periodic status checks
    Polling,
    /// Service reported completion; fetching the result
    Downloading,
    /// Result downloaded and available
    Completed,
    /// Processing or retrieval failed
    Failed,
}

impl JobPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobPhase::Idle => "idle",
            JobPhase::Uploading => "uploading",
            JobPhase::Polling => "polling",
            JobPhase::Downloading => "downloading",
            JobPhase::Completed => "completed",
            JobPhase::Failed => "failed",
        }
    }

    /// Check if this is a terminal phase (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobPhase::Completed | JobPhase::Failed)
    }

    /// Check if work is in flight.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            JobPhase::Uploading | JobPhase::Polling | JobPhase::Downloading
        )
    }
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single processing job tracked by the client.
///
/// Created on successful submission, mutated only by the polling loop,
/// destroyed locally on reset.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Job {
    /// Server-issued job id
    pub id: JobId,

    /// Current lifecycle phase
    pub phase: JobPhase,

    /// Progress percentage (0-100), never decreasing
    pub progress: f64,

    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a job that was just accepted by the service.
    pub fn new(id: JobId) -> Self {
        let now = Utc::now();
        Self {
            id,
            phase: JobPhase::Polling,
            progress: 0.0,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a progress report.
    ///
    /// Values are clamped to 0-100 and to the last-known value, so
    /// observed progress never regresses.
    pub fn record_progress(&mut self, progress: f64) {
        self.progress = self.progress.max(progress.clamp(0.0, 100.0));
        self.updated_at = Utc::now();
    }

    /// Completion was reported; the result fetch is starting.
    pub fn begin_download(&mut self) {
        self.phase = JobPhase::Downloading;
        self.updated_at = Utc::now();
    }

    /// Mark the job completed.
    pub fn complete(&mut self) {
        self.phase = JobPhase::Completed;
        self.progress = 100.0;
        self.updated_at = Utc::now();
    }

    /// Mark the job failed with a message.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.phase = JobPhase::Failed;
        self.error_message = Some(error.into());
        self.updated_at = Utc::now();
    }
}
