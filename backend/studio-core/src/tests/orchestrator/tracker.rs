// Unit tests for job state commits.

use crate::error::JobError;
use crate::orchestrator::handle::JobTracker;

use models::{AssetKind, ClassifiedError, ErrorKind, JobId, JobPhase, JobStatus, OperationRef};

fn submitting_tracker() -> JobTracker {
    let tracker = JobTracker::new(JobId::new(), AssetKind::Intro);
    assert!(tracker.transition(JobStatus::Submitting, JobPhase::Submitting));
    tracker
}

#[test]
fn given_new_tracker_when_inspected_then_idle_with_no_transitions() {
    let tracker = JobTracker::new(JobId::new(), AssetKind::Logo);

    let snapshot = tracker.snapshot();
    assert_eq!(snapshot.status, JobStatus::Idle);
    assert!(snapshot.transitions.is_empty());
    assert_eq!(snapshot.attempts, 0);
}

#[test]
fn given_polling_job_when_settled_then_operation_cleared_and_phase_terminal() {
    // GIVEN
    let tracker = submitting_tracker();
    assert!(tracker.start_polling(OperationRef::new("operations/1")));
    assert_eq!(
        tracker.snapshot().operation,
        Some(OperationRef::new("operations/1"))
    );

    // WHEN
    let error = ClassifiedError::new(ErrorKind::Timeout, "too slow");
    let settled = tracker.settle(JobStatus::TimedOut, Some(error));

    // THEN
    let snapshot = tracker.snapshot();
    assert_eq!(settled, JobStatus::TimedOut);
    assert_eq!(snapshot.operation, None);
    assert_eq!(snapshot.phase, JobPhase::TimedOut);
    assert_eq!(snapshot.error.map(|e| e.kind()), Some(ErrorKind::Timeout));
    assert_eq!(
        snapshot.transitions,
        vec![JobStatus::Submitting, JobStatus::Polling, JobStatus::TimedOut]
    );
}

/// **VALUE**: Once cancelled, no later completion can overwrite the status.
///
/// **WHY THIS MATTERS**: The worker may finish its remote call just after the
/// user cancels; the job must still end as Cancelled.
///
/// **BUG THIS CATCHES**: Would catch a transition that checks only the edge
/// table and not the cancellation token.
#[test]
fn given_cancelled_job_when_completion_attempted_then_rejected() {
    // GIVEN
    let tracker = submitting_tracker();
    tracker.cancel().unwrap();

    // WHEN
    let succeeded = tracker.transition(JobStatus::Succeeded, JobPhase::Completed);
    let settled = tracker.settle(JobStatus::Failed, None);

    // THEN
    assert!(!succeeded);
    assert_eq!(settled, JobStatus::Cancelled);
    assert_eq!(tracker.status(), JobStatus::Cancelled);
    assert!(tracker.is_cancelled());
}

#[test]
fn given_succeeded_job_when_cancelled_then_error_and_status_kept() {
    // GIVEN
    let tracker = submitting_tracker();
    assert!(tracker.transition(JobStatus::Succeeded, JobPhase::Completed));

    // WHEN
    let result = tracker.cancel();

    // THEN
    assert!(matches!(
        result,
        Err(JobError::NotCancellable {
            status: JobStatus::Succeeded,
            ..
        })
    ));
    assert_eq!(tracker.status(), JobStatus::Succeeded);
    assert!(!tracker.is_cancelled());
}

#[test]
fn given_submitting_job_when_timed_out_requested_then_edge_refused() {
    // GIVEN: TimedOut is only reachable from Polling
    let tracker = submitting_tracker();

    // WHEN
    let settled = tracker.settle(JobStatus::TimedOut, None);

    // THEN
    assert_eq!(settled, JobStatus::Submitting);
}

#[test]
fn given_terminal_job_when_phase_set_then_unchanged() {
    let tracker = submitting_tracker();
    tracker.cancel().unwrap();

    tracker.set_phase(JobPhase::Downloading);

    assert_eq!(tracker.snapshot().phase, JobPhase::Cancelled);
}

#[test]
fn given_attempts_recorded_when_read_then_counted() {
    let tracker = submitting_tracker();

    tracker.record_attempt();
    let second = tracker.record_attempt();

    assert_eq!(second, 2);
    assert_eq!(tracker.attempts(), 2);
}
