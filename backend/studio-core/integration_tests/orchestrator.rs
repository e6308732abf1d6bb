//! Job lifecycle tests against a scripted remote client.

use crate::helpers::{
    FakeRemoteClient, TEST_VIDEO_BYTES, default_poll, harness, harness_with_capacity,
    intro_request, reference_image,
};

use studio_core::classifier::{TIMEOUT_MESSAGE, UNKNOWN_MESSAGE};
use studio_core::error::{JobError, RemoteError};
use studio_core::orchestrator::{JobOutcome, PollConfig};
use studio_core::remote::{Artifact, PollStatus};

use models::{AssetKind, ErrorKind, GenerationRequest, JobPhase, JobStatus};

use std::time::Duration;

use tokio::time::{Instant, sleep};

/// **VALUE**: A sync job passes through exactly Submitting then Succeeded.
///
/// **WHY THIS MATTERS**: Front ends render progress from these transitions.
///
/// **BUG THIS CATCHES**: Would catch a sync job entering Polling, or a
/// duplicate transition being recorded.
#[tokio::test]
async fn given_valid_logo_request_when_submitted_then_submitting_then_succeeded() {
    // GIVEN
    let h = harness(FakeRemoteClient::new(), default_poll()).await;

    // WHEN
    let handle = h
        .orchestrator
        .submit(GenerationRequest::logo("a minimalist fox").with_label("Fox logo"))
        .unwrap();
    let tracker = handle.subscribe();
    let outcome = handle.wait().await;

    // THEN
    let snapshot = tracker.borrow().clone();
    assert_eq!(
        snapshot.transitions,
        vec![JobStatus::Submitting, JobStatus::Succeeded]
    );
    assert_eq!(snapshot.phase, JobPhase::Completed);
    assert_eq!(snapshot.phase.label(), "done");
    assert_eq!(h.client.generate_calls(), 1);

    let JobOutcome::Succeeded(asset) = outcome else {
        panic!("expected success, got {outcome:?}");
    };
    assert_eq!(asset.kind, AssetKind::Logo);
    assert!(asset.stored.path().exists());
    assert_eq!(asset.history_item.prompt(), "Fox logo");
    assert_eq!(asset.history_item.id(), asset.job_id.to_string());
}

#[tokio::test]
async fn given_unlabeled_logo_when_succeeded_then_history_records_kind_and_prompt() {
    // GIVEN
    let h = harness(FakeRemoteClient::new(), default_poll()).await;

    // WHEN
    let outcome = h
        .orchestrator
        .submit(GenerationRequest::logo("minimalist fox"))
        .unwrap()
        .wait()
        .await;

    // THEN
    assert_eq!(outcome.status(), JobStatus::Succeeded);
    let history = h.history.list().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind(), AssetKind::Logo);
    assert_eq!(history[0].prompt(), "minimalist fox");
}

#[tokio::test]
async fn given_text_request_when_succeeded_then_text_returned_and_stored() {
    // GIVEN
    let client = FakeRemoteClient::new().with_sync(Ok(Artifact::Text(
        "Welcome to the channel!".to_string(),
    )));
    let h = harness(client, default_poll()).await;

    // WHEN
    let outcome = h
        .orchestrator
        .submit(GenerationRequest::about("cooking channel, weekly uploads"))
        .unwrap()
        .wait()
        .await;

    // THEN
    let JobOutcome::Succeeded(asset) = outcome else {
        panic!("expected success");
    };
    assert_eq!(asset.text.as_deref(), Some("Welcome to the channel!"));
    assert_eq!(
        std::fs::read_to_string(asset.stored.path()).unwrap(),
        "Welcome to the channel!"
    );
}

/// **VALUE**: Invalid requests never reach the remote service.
///
/// **WHY THIS MATTERS**: Every remote call costs quota.
///
/// **BUG THIS CATCHES**: Would catch validation moving into the spawned task,
/// after the first remote call.
#[tokio::test]
async fn given_requests_missing_required_fields_when_submitted_then_invalid_input_and_no_remote_call()
 {
    // GIVEN
    let h = harness(FakeRemoteClient::new(), default_poll()).await;
    let invalid = vec![
        GenerationRequest::logo("   "),
        GenerationRequest::banner(""),
        GenerationRequest::thumbnail("my video", None),
        GenerationRequest::description(""),
        GenerationRequest::about(""),
        GenerationRequest::intro("Fox Studio", None),
        GenerationRequest::intro("", Some(reference_image())),
    ];

    for request in invalid {
        // WHEN
        let kind = request.kind();
        let result = h.orchestrator.submit(request);

        // THEN
        let Err(error) = result else {
            panic!("{kind} request should be rejected");
        };
        assert_eq!(error.kind(), ErrorKind::InvalidInput, "{kind}");
        assert!(!error.message().is_empty());
    }
    assert_eq!(h.client.remote_calls(), 0);
    assert!(h.history.list().await.is_empty());
}

#[tokio::test]
async fn given_rate_limited_remote_when_sync_job_runs_then_failed_and_no_history() {
    // GIVEN
    let client = FakeRemoteClient::new().with_sync(Err(RemoteError::http(
        429,
        "RESOURCE_EXHAUSTED: Quota exceeded",
    )));
    let h = harness(client, default_poll()).await;

    // WHEN
    let handle = h
        .orchestrator
        .submit(GenerationRequest::banner("retro gaming banner"))
        .unwrap();
    let watcher = handle.subscribe();
    let outcome = handle.wait().await;

    // THEN
    assert_eq!(outcome.status(), JobStatus::Failed);
    assert_eq!(outcome.error().unwrap().kind(), ErrorKind::RateLimited);
    assert_eq!(
        watcher.borrow().error.as_ref().map(|e| e.kind()),
        Some(ErrorKind::RateLimited)
    );
    assert!(h.history.list().await.is_empty());
    assert_eq!(h.stored_files(), 0);
}

/// **VALUE**: `attempts` counts every poll, the final done one included.
///
/// **BUG THIS CATCHES**: Would catch an off-by-one where only pending polls
/// are counted.
#[tokio::test(start_paused = true)]
async fn given_n_pending_polls_then_done_when_intro_runs_then_attempts_n_plus_one_and_succeeded() {
    // GIVEN: Three not-done answers, then done
    let client = FakeRemoteClient::new().with_pending_then_done(3);
    let h = harness(client, default_poll()).await;

    // WHEN
    let handle = h.orchestrator.submit(intro_request()).unwrap();
    let watcher = handle.subscribe();
    let outcome = handle.wait().await;

    // THEN
    let snapshot = watcher.borrow().clone();
    assert_eq!(snapshot.attempts, 4);
    assert_eq!(h.client.poll_calls(), 4);
    assert_eq!(h.client.fetch_calls(), 1);
    assert_eq!(
        snapshot.transitions,
        vec![JobStatus::Submitting, JobStatus::Polling, JobStatus::Succeeded]
    );
    assert_eq!(snapshot.operation, None);

    let JobOutcome::Succeeded(asset) = outcome else {
        panic!("expected success");
    };
    assert_eq!(std::fs::read(asset.stored.path()).unwrap(), TEST_VIDEO_BYTES);
    assert_eq!(asset.stored.path().extension().unwrap(), "mp4");
    assert_eq!(h.history.list().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn given_polling_job_when_inspected_then_operation_and_polling_label_visible() {
    // GIVEN: A job that never finishes
    let h = harness(FakeRemoteClient::new(), default_poll()).await;
    let handle = h.orchestrator.submit(intro_request()).unwrap();

    // WHEN: Between two polls
    sleep(Duration::from_secs(1)).await;

    // THEN
    let snapshot = handle.snapshot();
    assert_eq!(snapshot.status, JobStatus::Polling);
    assert_eq!(snapshot.phase.label(), "waiting for remote processing");
    assert!(snapshot.operation.is_some());
    assert_eq!(snapshot.attempts, 1);

    handle.cancel().unwrap();
}

/// **VALUE**: The poll interval is honored.
///
/// **BUG THIS CATCHES**: Would catch a busy loop or a schedule that ignores
/// the configured interval.
#[tokio::test(start_paused = true)]
async fn given_ten_second_interval_when_three_polls_made_then_twenty_seconds_elapse() {
    // GIVEN
    let client = FakeRemoteClient::new().with_pending_then_done(2);
    let h = harness(client, default_poll()).await;
    let started = Instant::now();

    // WHEN
    let outcome = h.orchestrator.submit(intro_request()).unwrap().wait().await;

    // THEN: Polls at 0 s, 10 s and 20 s
    assert_eq!(outcome.status(), JobStatus::Succeeded);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(20), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(21), "{elapsed:?}");
}

/// **VALUE**: A job that never completes ends as TimedOut at its deadline.
///
/// **WHY THIS MATTERS**: Without a bound a stuck remote operation would keep
/// the job alive forever.
///
/// **BUG THIS CATCHES**: Would catch the deadline being measured from the
/// first poll instead of from submission, or a timed-out job being appended
/// to history.
#[tokio::test(start_paused = true)]
async fn given_operation_never_done_when_max_wait_passes_then_timed_out_and_history_unchanged() {
    // GIVEN
    let poll = PollConfig {
        max_wait: Duration::from_secs(60),
        ..default_poll()
    };
    let h = harness(FakeRemoteClient::new(), poll).await;
    let started = Instant::now();

    // WHEN
    let outcome = h.orchestrator.submit(intro_request()).unwrap().wait().await;

    // THEN
    assert_eq!(outcome.status(), JobStatus::TimedOut);
    let error = outcome.error().unwrap();
    assert_eq!(error.kind(), ErrorKind::Timeout);
    assert_eq!(error.message(), TIMEOUT_MESSAGE);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(60), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(61), "{elapsed:?}");
    assert!(h.client.poll_calls() <= 7);
    assert!(h.history.list().await.is_empty());
    assert_eq!(h.client.fetch_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn given_max_attempts_when_never_done_then_timed_out_after_cap() {
    // GIVEN
    let poll = PollConfig {
        max_attempts: Some(5),
        ..default_poll()
    };
    let h = harness(FakeRemoteClient::new(), poll).await;
    let started = Instant::now();

    // WHEN
    let handle = h.orchestrator.submit(intro_request()).unwrap();
    let watcher = handle.subscribe();
    let outcome = handle.wait().await;

    // THEN: Polls at 0 s through 40 s, no sleep after the last one
    assert_eq!(outcome.status(), JobStatus::TimedOut);
    assert_eq!(watcher.borrow().attempts, 5);
    assert_eq!(h.client.poll_calls(), 5);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(40), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_secs(41), "elapsed {elapsed:?}");
}

/// **VALUE**: Hitting the attempt cap ends the job at once.
///
/// **BUG THIS CATCHES**: Would catch the loop sleeping a full interval after
/// its last allowed check before reporting TimedOut.
#[tokio::test(start_paused = true)]
async fn given_single_attempt_cap_when_pending_then_timed_out_without_waiting() {
    // GIVEN
    let poll = PollConfig {
        max_attempts: Some(1),
        ..default_poll()
    };
    let h = harness(FakeRemoteClient::new(), poll).await;
    let started = Instant::now();

    // WHEN
    let outcome = h.orchestrator.submit(intro_request()).unwrap().wait().await;

    // THEN
    assert_eq!(outcome.status(), JobStatus::TimedOut);
    assert_eq!(h.client.poll_calls(), 1);
    assert!(started.elapsed() < Duration::from_secs(1));
}

/// **VALUE**: No poll happens after cancellation.
///
/// **WHY THIS MATTERS**: A cancelled job must stop consuming quota.
///
/// **BUG THIS CATCHES**: Would catch a poll loop that only checks the token
/// after its sleep finishes and then polls once more.
#[tokio::test(start_paused = true)]
async fn given_polling_job_when_cancelled_then_no_further_polls_and_cancelled() {
    // GIVEN: Polls at 0 s, 10 s, 20 s
    let h = harness(FakeRemoteClient::new(), default_poll()).await;
    let handle = h.orchestrator.submit(intro_request()).unwrap();
    sleep(Duration::from_secs(25)).await;
    let polls_before_cancel = h.client.poll_calls();
    assert_eq!(polls_before_cancel, 3);

    // WHEN
    h.orchestrator.cancel(&handle).unwrap();
    sleep(Duration::from_secs(120)).await;

    // THEN
    assert_eq!(h.client.poll_calls(), polls_before_cancel);
    assert_eq!(handle.status(), JobStatus::Cancelled);
    assert_eq!(handle.snapshot().operation, None);
    let outcome = handle.wait().await;
    assert!(matches!(outcome, JobOutcome::Cancelled));
    assert!(h.history.list().await.is_empty());
    assert_eq!(h.stored_files(), 0);
}

#[tokio::test(start_paused = true)]
async fn given_slow_sync_call_when_cancelled_during_submitting_then_cancelled_without_artifact() {
    // GIVEN
    let client = FakeRemoteClient::new().with_call_delay(Duration::from_secs(30));
    let h = harness(client, default_poll()).await;
    let handle = h
        .orchestrator
        .submit(GenerationRequest::logo("fox"))
        .unwrap();
    sleep(Duration::from_secs(1)).await;
    assert_eq!(handle.status(), JobStatus::Submitting);

    // WHEN
    handle.cancel().unwrap();
    let watcher = handle.subscribe();
    let outcome = handle.wait().await;

    // THEN
    assert!(matches!(outcome, JobOutcome::Cancelled));
    assert_eq!(
        watcher.borrow().transitions,
        vec![JobStatus::Submitting, JobStatus::Cancelled]
    );
    assert_eq!(h.stored_files(), 0);
    assert!(h.history.list().await.is_empty());
}

/// **VALUE**: A download that finishes after cancellation is discarded.
///
/// **BUG THIS CATCHES**: Would catch a late download overwriting Cancelled
/// with Succeeded or leaving its file on disk.
#[tokio::test(start_paused = true)]
async fn given_download_in_flight_when_cancelled_then_result_discarded() {
    // GIVEN: Done on first poll, download takes 5 s
    let client = FakeRemoteClient::new()
        .with_pending_then_done(0)
        .with_fetch_delay(Duration::from_secs(5));
    let h = harness(client, default_poll()).await;
    let handle = h.orchestrator.submit(intro_request()).unwrap();
    sleep(Duration::from_secs(1)).await;
    assert_eq!(handle.snapshot().phase, JobPhase::Downloading);

    // WHEN
    handle.cancel().unwrap();
    let outcome = handle.wait().await;

    // THEN
    assert!(matches!(outcome, JobOutcome::Cancelled));
    assert_eq!(h.client.fetch_calls(), 1);
    assert_eq!(h.stored_files(), 0);
    assert!(h.history.list().await.is_empty());
}

#[tokio::test]
async fn given_finished_job_when_cancelled_then_error() {
    // GIVEN
    let h = harness(FakeRemoteClient::new(), default_poll()).await;
    let handle = h
        .orchestrator
        .submit(GenerationRequest::description("unboxing video"))
        .unwrap();
    let mut rx = handle.subscribe();
    rx.wait_for(|s| s.status.is_terminal()).await.unwrap();

    // WHEN
    let result = h.orchestrator.cancel(&handle);

    // THEN
    assert!(matches!(
        result,
        Err(JobError::NotCancellable {
            status: JobStatus::Succeeded,
            ..
        })
    ));
    assert!(matches!(handle.wait().await, JobOutcome::Succeeded(_)));
}

#[tokio::test(start_paused = true)]
async fn given_failed_poll_when_intro_runs_then_failed_with_classification_and_no_history() {
    // GIVEN
    let client = FakeRemoteClient::new()
        .with_poll(Ok(PollStatus::Pending))
        .with_poll(Err(RemoteError::http(503, "The service is currently unavailable")));
    let h = harness(client, default_poll()).await;

    // WHEN
    let outcome = h.orchestrator.submit(intro_request()).unwrap().wait().await;

    // THEN
    assert_eq!(outcome.status(), JobStatus::Failed);
    assert_eq!(outcome.error().unwrap().kind(), ErrorKind::RemoteUnavailable);
    assert_eq!(h.client.poll_calls(), 2);
    assert!(h.history.list().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn given_operation_reports_failure_when_polled_then_failed_with_generic_message() {
    // GIVEN
    let client = FakeRemoteClient::new().with_poll(Ok(PollStatus::Failed {
        message: "video was filtered: unsafe content".to_string(),
    }));
    let h = harness(client, default_poll()).await;

    // WHEN
    let outcome = h.orchestrator.submit(intro_request()).unwrap().wait().await;

    // THEN
    let error = outcome.error().unwrap();
    assert_eq!(outcome.status(), JobStatus::Failed);
    assert_eq!(error.kind(), ErrorKind::Unknown);
    assert_eq!(error.message(), UNKNOWN_MESSAGE);
    assert_eq!(h.client.fetch_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn given_download_fails_when_intro_completes_then_failed_and_nothing_stored() {
    // GIVEN
    let client = FakeRemoteClient::new()
        .with_pending_then_done(1)
        .with_fetch(Err(RemoteError::network("connection reset by peer")));
    let h = harness(client, default_poll()).await;

    // WHEN
    let outcome = h.orchestrator.submit(intro_request()).unwrap().wait().await;

    // THEN
    assert_eq!(outcome.status(), JobStatus::Failed);
    assert_eq!(outcome.error().unwrap().kind(), ErrorKind::RemoteUnavailable);
    assert_eq!(h.stored_files(), 0);
    assert!(h.history.list().await.is_empty());
}

#[tokio::test]
async fn given_submit_rejected_when_intro_runs_then_failed_without_polling() {
    // GIVEN
    let client = FakeRemoteClient::new().with_submit(Err(RemoteError::http(
        400,
        "API key not valid. Please pass a valid API key.",
    )));
    let h = harness(client, default_poll()).await;

    // WHEN
    let handle = h.orchestrator.submit(intro_request()).unwrap();
    let watcher = handle.subscribe();
    let outcome = handle.wait().await;

    // THEN
    assert_eq!(outcome.error().unwrap().kind(), ErrorKind::AuthInvalid);
    assert_eq!(
        watcher.borrow().transitions,
        vec![JobStatus::Submitting, JobStatus::Failed]
    );
    assert_eq!(h.client.poll_calls(), 0);
}

/// **VALUE**: The wait budget also bounds single-call jobs.
///
/// **BUG THIS CATCHES**: Would catch a sync call that hangs forever because
/// only the poll loop checks the deadline.
#[tokio::test(start_paused = true)]
async fn given_sync_call_slower_than_max_wait_when_run_then_failed_with_timeout_kind() {
    // GIVEN
    let client = FakeRemoteClient::new().with_call_delay(Duration::from_secs(900));
    let h = harness(client, default_poll()).await;

    // WHEN
    let outcome = h
        .orchestrator
        .submit(GenerationRequest::logo("fox"))
        .unwrap()
        .wait()
        .await;

    // THEN: Sync kinds have no TimedOut state
    assert_eq!(outcome.status(), JobStatus::Failed);
    assert_eq!(outcome.error().unwrap().kind(), ErrorKind::Timeout);
}

#[tokio::test]
async fn given_two_jobs_completed_in_order_when_history_listed_then_newest_first() {
    // GIVEN
    let h = harness(FakeRemoteClient::new(), default_poll()).await;

    // WHEN
    let a = h
        .orchestrator
        .submit(GenerationRequest::logo("first"))
        .unwrap()
        .wait()
        .await;
    let b = h
        .orchestrator
        .submit(GenerationRequest::banner("second"))
        .unwrap()
        .wait()
        .await;

    // THEN
    let (JobOutcome::Succeeded(a), JobOutcome::Succeeded(b)) = (a, b) else {
        panic!("both jobs should succeed");
    };
    let ids: Vec<String> = h
        .history
        .list()
        .await
        .iter()
        .map(|item| item.id().to_string())
        .collect();
    assert_eq!(ids, vec![b.job_id.to_string(), a.job_id.to_string()]);
}

#[tokio::test]
async fn given_many_concurrent_jobs_when_all_finish_then_all_recorded() {
    // GIVEN
    let h = harness(FakeRemoteClient::new(), default_poll()).await;
    let handles: Vec<_> = (0..8)
        .map(|i| {
            h.orchestrator
                .submit(GenerationRequest::description(format!("video {i}")))
                .unwrap()
        })
        .collect();

    // WHEN
    for handle in handles {
        assert_eq!(handle.wait().await.status(), JobStatus::Succeeded);
    }

    // THEN
    assert_eq!(h.history.list().await.len(), 8);
}

/// **VALUE**: Items leaving history take their stored files with them.
///
/// **WHY THIS MATTERS**: The artifact directory is a cache bounded by the
/// history capacity; without this it grows with every generation.
///
/// **BUG THIS CATCHES**: Would catch eviction or clear dropping the record
/// while the `generated-*` file stays on disk.
#[tokio::test]
async fn given_capacity_two_when_third_job_evicts_and_history_cleared_then_files_released() {
    // GIVEN
    let h = harness_with_capacity(FakeRemoteClient::new(), default_poll(), 2).await;
    let mut stored = Vec::new();
    for prompt in ["first fox", "second fox", "third fox"] {
        let JobOutcome::Succeeded(asset) = h
            .orchestrator
            .submit(GenerationRequest::logo(prompt))
            .unwrap()
            .wait()
            .await
        else {
            panic!("job should succeed");
        };
        stored.push(asset.stored.path().to_path_buf());
    }

    // THEN: Oldest evicted along with its file
    assert_eq!(h.history.list().await.len(), 2);
    assert_eq!(h.stored_files(), 2);
    assert!(!stored[0].exists());
    assert!(stored[1].exists() && stored[2].exists());

    // WHEN
    h.history.clear().await.unwrap();

    // THEN
    assert!(h.history.list().await.is_empty());
    assert_eq!(h.stored_files(), 0);
}
