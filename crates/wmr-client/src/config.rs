//! Client configuration.

use std::time::Duration;

/// Configuration for the watermark-removal service client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the service
    pub base_url: String,
    /// Request timeout (uploads and downloads can be large)
    pub timeout: Duration,
    /// Delay between status polls
    pub poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(120),
            poll_interval: Duration::from_millis(1500),
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("WMR_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            timeout: Duration::from_secs(
                std::env::var("WMR_REQUEST_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
            poll_interval: Duration::from_millis(
                std::env::var("WMR_POLL_INTERVAL_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1500),
            ),
        }
    }
}
