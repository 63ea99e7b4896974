//! Contract tests for the service client against a mock server.

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wmr_client::{ClientConfig, ClientError, MediaHandle, ServiceClient};
use wmr_models::{JobId, PixelRect, RemoteStatus, VideoType, WatermarkLocation, WatermarkSource};

fn client_for(server: &MockServer) -> ServiceClient {
    ServiceClient::new(ClientConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
        poll_interval: Duration::from_millis(25),
    })
    .expect("client")
}

async fn sample_video(dir: &tempfile::TempDir) -> MediaHandle {
    let path = dir.path().join("clip.mp4");
    std::fs::write(&path, b"fake mp4 payload").expect("write sample");
    MediaHandle::import(&path).await.expect("import")
}

async fn submitted_body(server: &MockServer) -> String {
    let requests = server.received_requests().await.expect("requests recorded");
    assert_eq!(requests.len(), 1);
    String::from_utf8_lossy(&requests[0].body).into_owned()
}

#[tokio::test]
async fn test_submit_preset_sends_location_token_only() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/inpaint"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"job_id": "job-1"})),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let input = sample_video(&dir).await;
    let client = client_for(&server);

    let job_id = client
        .submit(
            &input,
            VideoType::Capcut,
            &WatermarkSource::Preset(WatermarkLocation::TopLeft),
        )
        .await
        .expect("submit");
    assert_eq!(job_id, JobId::from_string("job-1"));

    let body = submitted_body(&server).await;
    assert!(body.contains("name=\"video\"; filename=\"clip.mp4\""));
    assert!(body.contains("name=\"video_type\""));
    assert!(body.contains("capcut"));
    assert!(body.contains("name=\"watermark_location\""));
    assert!(body.contains("top_left"));
    // Preset and explicit coordinates are mutually exclusive
    assert!(!body.contains("watermark_x"));
    assert!(!body.contains("watermark_width"));
}

#[tokio::test]
async fn test_submit_region_sends_coordinates_only() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/inpaint"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"job_id": "job-2"})),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let input = sample_video(&dir).await;
    let client = client_for(&server);

    client
        .submit(
            &input,
            VideoType::Capcut,
            &WatermarkSource::Region(PixelRect::new(91, 92, 686, 366)),
        )
        .await
        .expect("submit");

    let body = submitted_body(&server).await;
    assert!(body.contains("name=\"watermark_x\""));
    assert!(body.contains("91"));
    assert!(body.contains("name=\"watermark_y\""));
    assert!(body.contains("92"));
    assert!(body.contains("name=\"watermark_width\""));
    assert!(body.contains("686"));
    assert!(body.contains("name=\"watermark_height\""));
    assert!(body.contains("366"));
    assert!(!body.contains("watermark_location"));
}

#[tokio::test]
async fn test_submit_server_error_maps_to_submission() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/inpaint"))
        .respond_with(ResponseTemplate::new(500).set_body_string("mask unavailable"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let input = sample_video(&dir).await;
    let client = client_for(&server);

    let result = client
        .submit(
            &input,
            VideoType::Renderforest,
            &WatermarkSource::Preset(WatermarkLocation::TopLeft),
        )
        .await;

    match result {
        Err(ClientError::Submission(message)) => {
            assert!(message.contains("500"));
            assert!(message.contains("mask unavailable"));
        }
        other => panic!("expected submission error, got {:?}", other.map(|id| id.to_string())),
    }
}

#[tokio::test]
async fn test_submit_rejects_revoked_handle_without_network() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let input = sample_video(&dir).await;
    input.revoke();

    let client = client_for(&server);
    let result = client
        .submit(
            &input,
            VideoType::Capcut,
            &WatermarkSource::Preset(WatermarkLocation::TopLeft),
        )
        .await;

    assert!(matches!(result, Err(ClientError::InvalidInput(_))));
    assert!(server.received_requests().await.expect("recorded").is_empty());
}

#[tokio::test]
async fn test_status_parses_service_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "job_id": "job-1",
            "status": "processing",
            "progress": 41.7
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let status = client
        .status(&JobId::from_string("job-1"))
        .await
        .expect("status");

    assert_eq!(status.status, RemoteStatus::Processing);
    assert_eq!(status.progress, 41.7);
}

#[tokio::test]
async fn test_status_error_maps_to_polling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/job-9"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Job not found"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.status(&JobId::from_string("job-9")).await;

    assert!(matches!(result, Err(ClientError::Polling(_))));
}

#[tokio::test]
async fn test_download_returns_payload_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PROCESSED".to_vec()))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bytes = client
        .download(&JobId::from_string("job-1"))
        .await
        .expect("download");

    assert_eq!(bytes, b"PROCESSED");
}

#[tokio::test]
async fn test_download_error_maps_to_download() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/job-1"))
        .respond_with(ResponseTemplate::new(400).set_body_string("not completed"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.download(&JobId::from_string("job-1")).await;

    assert!(matches!(result, Err(ClientError::Download(_))));
}

#[tokio::test]
async fn test_cleanup_ignores_failures() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/cleanup/job-1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    // Must not panic or surface an error
    client.cleanup(&JobId::from_string("job-1")).await;
}
