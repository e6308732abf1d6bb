//! End-to-end tests through the [`Studio`] entry point.

use crate::helpers::{FakeRemoteClient, count_files, intro_request};

use studio_core::Studio;
use studio_core::config::StudioConfig;
use studio_core::error::{CoreError, RemoteError};
use studio_core::orchestrator::JobOutcome;
use studio_core::remote::RemoteJobClient;

use models::{AssetKind, ErrorKind, GenerationRequest, JobStatus};

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

fn fast_config(capacity: usize) -> StudioConfig {
    let mut config = StudioConfig::default();
    config.history.capacity = capacity;
    config.polling.interval_secs = 1;
    config.polling.max_wait_secs = 30;
    config
}

async fn open_studio(dir: &TempDir, config: &StudioConfig, client: FakeRemoteClient) -> Studio {
    Studio::open(
        config,
        dir.path(),
        Arc::new(client) as Arc<dyn RemoteJobClient>,
    )
    .await
    .unwrap()
}

/// **VALUE**: Submit, wait and list work together through one object.
///
/// **BUG THIS CATCHES**: Would catch `Studio` reading from a different
/// history store than the one the orchestrator appends to.
#[tokio::test]
async fn given_open_studio_when_jobs_succeed_then_history_lists_them_newest_first() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    let studio = open_studio(&dir, &fast_config(10), FakeRemoteClient::new()).await;

    // WHEN
    for request in [
        GenerationRequest::logo("fox logo"),
        GenerationRequest::description("first video").with_label("Video 1 description"),
    ] {
        let outcome = studio.submit_request(request).unwrap().wait().await;
        assert_eq!(outcome.status(), JobStatus::Succeeded);
    }

    // THEN
    let history = studio.get_history().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].kind(), AssetKind::Description);
    assert_eq!(history[0].prompt(), "Video 1 description");
    assert_eq!(history[1].kind(), AssetKind::Logo);
    assert_eq!(count_files(&StudioConfig::artifact_dir(dir.path())), 2);
}

#[tokio::test]
async fn given_history_when_cleared_then_empty_and_stays_empty_after_reopen() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    let config = fast_config(10);
    let studio = open_studio(&dir, &config, FakeRemoteClient::new()).await;
    studio
        .submit_request(GenerationRequest::banner("banner"))
        .unwrap()
        .wait()
        .await;

    // WHEN
    studio.clear_history().await.unwrap();

    // THEN
    assert!(studio.get_history().await.is_empty());
    let reopened = open_studio(&dir, &config, FakeRemoteClient::new()).await;
    assert!(reopened.get_history().await.is_empty());
}

#[tokio::test]
async fn given_capacity_two_when_three_jobs_succeed_then_two_newest_kept() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    let studio = open_studio(&dir, &fast_config(2), FakeRemoteClient::new()).await;

    // WHEN
    let mut ids = Vec::new();
    for prompt in ["one", "two", "three"] {
        let JobOutcome::Succeeded(asset) = studio
            .submit_request(GenerationRequest::about(prompt))
            .unwrap()
            .wait()
            .await
        else {
            panic!("job should succeed");
        };
        ids.push(asset.job_id.to_string());
    }

    // THEN
    let listed: Vec<String> = studio
        .get_history()
        .await
        .iter()
        .map(|item| item.id().to_string())
        .collect();
    assert_eq!(listed, vec![ids[2].clone(), ids[1].clone()]);
}

#[tokio::test(start_paused = true)]
async fn given_running_intro_when_cancelled_through_studio_then_cancelled() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    let studio = open_studio(&dir, &fast_config(10), FakeRemoteClient::new()).await;
    let handle = studio.submit_request(intro_request()).unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    // WHEN
    studio.cancel_request(&handle).unwrap();

    // THEN
    assert!(matches!(handle.wait().await, JobOutcome::Cancelled));
    assert!(studio.get_history().await.is_empty());
}

#[tokio::test]
async fn given_missing_key_remote_when_submitted_then_auth_missing() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    let client =
        FakeRemoteClient::new().with_sync(Err(RemoteError::auth("API key is not configured")));
    let studio = open_studio(&dir, &fast_config(10), client).await;

    // WHEN
    let outcome = studio
        .submit_request(GenerationRequest::logo("fox"))
        .unwrap()
        .wait()
        .await;

    // THEN
    assert_eq!(outcome.error().unwrap().kind(), ErrorKind::AuthMissing);
}

#[tokio::test]
async fn given_invalid_config_when_opened_then_config_error() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    let mut config = StudioConfig::default();
    config.polling.interval_secs = 0;

    // WHEN
    let result = Studio::open(
        &config,
        dir.path(),
        Arc::new(FakeRemoteClient::new()) as Arc<dyn RemoteJobClient>,
    )
    .await;

    // THEN
    assert!(matches!(result, Err(CoreError::Config(_))));
}
