//! HTTP client for the watermark-removal service.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, warn};

use wmr_models::{JobId, VideoType, WatermarkSource};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::media::MediaHandle;
use crate::types::{StatusResponse, SubmitResponse};

/// Typed client for the inpainting service contract.
pub struct ServiceClient {
    http: Client,
    config: ClientConfig,
}

impl ServiceClient {
    /// Create a new service client.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Submit a video for inpainting. Returns the server-issued job id.
    ///
    /// The multipart body carries the file, the `video_type`
    /// discriminator, and either a preset location token or the four
    /// region coordinate fields, never both.
    pub async fn submit(
        &self,
        input: &MediaHandle,
        video_type: VideoType,
        source: &WatermarkSource,
    ) -> ClientResult<JobId> {
        let path = input
            .path()
            .ok_or_else(|| ClientError::InvalidInput("input handle has been revoked".to_string()))?;

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video.mp4".to_string());

        let mut form = Form::new()
            .part(
                "video",
                Part::bytes(bytes).file_name(file_name).mime_str("video/mp4")?,
            )
            .text("video_type", video_type.as_str());

        form = match source {
            WatermarkSource::Preset(location) => form.text("watermark_location", location.as_str()),
            WatermarkSource::Region(rect) => form
                .text("watermark_x", rect.x.to_string())
                .text("watermark_y", rect.y.to_string())
                .text("watermark_width", rect.width.to_string())
                .text("watermark_height", rect.height.to_string()),
        };

        let url = format!("{}/inpaint", self.config.base_url);
        debug!("Submitting {} to {}", path.display(), url);

        let response = self.http.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Submission(format!(
                "service returned {}: {}",
                status, body
            )));
        }

        let accepted: SubmitResponse = response.json().await?;
        Ok(JobId::from_string(accepted.job_id))
    }

    /// Query processing status for a job.
    pub async fn status(&self, job_id: &JobId) -> ClientResult<StatusResponse> {
        let url = format!("{}/status/{}", self.config.base_url, job_id);

        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Polling(format!(
                "service returned {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    /// Download the processed result as raw bytes.
    pub async fn download(&self, job_id: &JobId) -> ClientResult<Vec<u8>> {
        let url = format!("{}/download/{}", self.config.base_url, job_id);
        debug!("Downloading result from {}", url);

        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Download(format!(
                "service returned {}: {}",
                status, body
            )));
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Ask the service to drop a job's server-side artifacts.
    ///
    /// Best effort: failures are logged and ignored.
    pub async fn cleanup(&self, job_id: &JobId) {
        let url = format!("{}/cleanup/{}", self.config.base_url, job_id);

        match self.http.delete(&url).send().await {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => {
                warn!("Cleanup for job {} returned {}", job_id, response.status());
            }
            Err(e) => {
                warn!("Cleanup request for job {} failed: {}", job_id, e);
            }
        }
    }
}
