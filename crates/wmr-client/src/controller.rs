//! Job lifecycle controller.
//!
//! Owns the lifecycle of one processing job: submission, status polling,
//! completion/failure resolution, resource cleanup. Consumers observe the
//! controller through a watch channel of [`JobSnapshot`]s; only the
//! controller and its polling task ever publish to it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use wmr_models::{Job, JobId, JobPhase, RemoteStatus, VideoType, WatermarkSource};

use crate::error::{ClientError, ClientResult};
use crate::media::MediaHandle;
use crate::service::ServiceClient;

/// Reactive view of the controller's current state.
#[derive(Debug, Clone, Default)]
pub struct JobSnapshot {
    /// Current lifecycle phase
    pub phase: JobPhase,
    /// Progress percentage (0-100), never decreasing within one job
    pub progress: f64,
    /// Active job id, once a submission has been accepted
    pub job_id: Option<JobId>,
    /// User-facing error message for `Failed` (or a failed submission)
    pub error_message: Option<String>,
    /// Handle to the processed result, present once `Completed`
    pub result: Option<MediaHandle>,
}

impl JobSnapshot {
    fn from_job(job: &Job) -> Self {
        Self {
            phase: job.phase,
            progress: job.progress,
            job_id: Some(job.id.clone()),
            error_message: job.error_message.clone(),
            result: None,
        }
    }
}

struct ActiveJob {
    id: JobId,
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Client-side controller for a single processing job.
///
/// Exactly one job is active at a time: submitting while one is in
/// flight cancels the previous polling loop before the new upload
/// begins, so a stale loop can never publish over the new job.
pub struct JobController {
    service: Arc<ServiceClient>,
    poll_interval: Duration,
    snapshot: Arc<watch::Sender<JobSnapshot>>,
    active: Option<ActiveJob>,
    input: Option<MediaHandle>,
}

impl JobController {
    /// Create a controller over a service client.
    pub fn new(service: ServiceClient) -> Self {
        let poll_interval = service.config().poll_interval;
        let (snapshot, _) = watch::channel(JobSnapshot::default());

        Self {
            service: Arc::new(service),
            poll_interval,
            snapshot: Arc::new(snapshot),
            active: None,
            input: None,
        }
    }

    /// Subscribe to state snapshots.
    pub fn subscribe(&self) -> watch::Receiver<JobSnapshot> {
        self.snapshot.subscribe()
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> JobSnapshot {
        self.snapshot.borrow().clone()
    }

    /// The underlying service client.
    pub fn service(&self) -> &ServiceClient {
        &self.service
    }

    /// Submit a video for processing.
    ///
    /// Takes ownership of the input handle; it is revoked on [`reset`]
    /// or when a later submission replaces it. On success the controller
    /// is polling and the server-issued job id is returned; on failure
    /// it is back to idle with the error surfaced in the snapshot.
    ///
    /// [`reset`]: Self::reset
    pub async fn submit(
        &mut self,
        input: MediaHandle,
        video_type: VideoType,
        source: WatermarkSource,
    ) -> ClientResult<JobId> {
        // Invalid input never starts a job, so it leaves any active one
        // untouched.
        if input.path().is_none() {
            return Err(ClientError::InvalidInput(
                "input handle has been revoked".to_string(),
            ));
        }

        // A new job supersedes any active one, polling loop included.
        self.cancel_active();

        // Replace (and release) any previously staged input.
        match self.input.take() {
            Some(previous) if !previous.shares_backing(&input) => previous.revoke(),
            _ => {}
        }
        self.input = Some(input.clone());

        let superseded = self.snapshot.send_replace(JobSnapshot {
            phase: JobPhase::Uploading,
            ..Default::default()
        });
        if let Some(result) = superseded.result {
            result.revoke();
        }

        let job_id = match self.service.submit(&input, video_type, &source).await {
            Ok(id) => id,
            Err(e) => {
                // No job was created; surface the error and return to idle.
                self.snapshot.send_replace(JobSnapshot {
                    phase: JobPhase::Idle,
                    error_message: Some(e.to_string()),
                    ..Default::default()
                });
                return Err(e);
            }
        };

        info!("Job {} accepted, polling for status", job_id);

        let job = Job::new(job_id.clone());
        self.snapshot.send_replace(JobSnapshot::from_job(&job));

        let (cancel, cancel_rx) = watch::channel(false);
        let task = tokio::spawn(poll_job(
            Arc::clone(&self.service),
            Arc::clone(&self.snapshot),
            job,
            self.poll_interval,
            cancel_rx,
        ));

        self.active = Some(ActiveJob {
            id: job_id.clone(),
            cancel,
            task,
        });

        Ok(job_id)
    }

    /// Cancel any in-flight polling, release both media handles, and
    /// return to idle. Idempotent.
    pub fn reset(&mut self) {
        self.cancel_active();

        if let Some(input) = self.input.take() {
            input.revoke();
        }

        let superseded = self.snapshot.send_replace(JobSnapshot::default());
        if let Some(result) = superseded.result {
            result.revoke();
        }
    }

    /// Stop the active polling loop without touching handles.
    fn cancel_active(&mut self) {
        if let Some(active) = self.active.take() {
            // Signal first so an in-flight response is discarded, then
            // stop the task outright.
            let _ = active.cancel.send(true);
            active.task.abort();
            debug!("Cancelled polling for job {}", active.id);
        }
    }
}

impl Drop for JobController {
    fn drop(&mut self) {
        // Teardown bounds handle lifetimes the same way reset does.
        self.reset();
    }
}

/// Publish a snapshot on behalf of a job, refusing if the job has been
/// superseded.
///
/// The controller replaces the channel value (with no job id, or a new
/// one) before a superseding submission or reset proceeds. A late publish
/// from a cancelled loop, carrying a response that was already in flight
/// when the cancel signal fired, compares against the current job id
/// under the channel lock and is discarded.
fn publish(snapshot: &watch::Sender<JobSnapshot>, job_id: &JobId, next: JobSnapshot) -> bool {
    snapshot.send_if_modified(|current| {
        if current.job_id.as_ref() == Some(job_id) {
            *current = next;
            true
        } else {
            debug!("Discarding update from superseded job {}", job_id);
            false
        }
    })
}

/// Poll a job to completion, publishing snapshots along the way.
///
/// Cancellation is checked at every suspension point, and every publish
/// re-checks that the job is still current, so nothing lands after a
/// superseding submission or reset.
async fn poll_job(
    service: Arc<ServiceClient>,
    snapshot: Arc<watch::Sender<JobSnapshot>>,
    mut job: Job,
    poll_interval: Duration,
    mut cancel: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; the first status check
    // should wait a full interval.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = cancel.changed() => return,
            _ = ticker.tick() => {}
        }

        let report = tokio::select! {
            _ = cancel.changed() => return,
            result = service.status(&job.id) => result,
        };

        match report {
            Ok(status) => {
                job.record_progress(status.progress);

                match status.status {
                    RemoteStatus::Processing => {
                        if !publish(&snapshot, &job.id, JobSnapshot::from_job(&job)) {
                            return;
                        }
                    }
                    RemoteStatus::Completed => {
                        job.begin_download();
                        if !publish(&snapshot, &job.id, JobSnapshot::from_job(&job)) {
                            return;
                        }
                        fetch_result(&service, &snapshot, &mut job, &mut cancel).await;
                        return;
                    }
                    RemoteStatus::Failed => {
                        let message = status
                            .error
                            .unwrap_or_else(|| "Video processing failed".to_string());
                        job.fail(message);
                        publish(&snapshot, &job.id, JobSnapshot::from_job(&job));
                        return;
                    }
                }
            }
            Err(e) => {
                warn!("Status check for job {} failed: {}", job.id, e);
                job.fail(format!("Error checking job status: {}", e));
                publish(&snapshot, &job.id, JobSnapshot::from_job(&job));
                return;
            }
        }
    }
}

/// Fetch the completed result once and publish the terminal snapshot.
async fn fetch_result(
    service: &ServiceClient,
    snapshot: &watch::Sender<JobSnapshot>,
    job: &mut Job,
    cancel: &mut watch::Receiver<bool>,
) {
    let fetched = tokio::select! {
        _ = cancel.changed() => return,
        result = service.download(&job.id) => result,
    };

    let handle = match fetched {
        Ok(bytes) => MediaHandle::from_bytes("result", &bytes).await,
        Err(e) => Err(e),
    };

    match handle {
        Ok(result) => {
            job.complete();
            let mut published = JobSnapshot::from_job(job);
            published.result = Some(result.clone());
            // Refused means a newer submission owns the channel; the
            // fetched result is released instead of leaking.
            if !publish(snapshot, &job.id, published) {
                result.revoke();
            }
        }
        Err(e) => {
            warn!("Result retrieval for job {} failed: {}", job.id, e);
            job.fail(format!("Failed to retrieve result: {}", e));
            publish(snapshot, &job.id, JobSnapshot::from_job(job));
        }
    }
}
