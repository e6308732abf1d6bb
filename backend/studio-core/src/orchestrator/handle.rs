use crate::artifact::StoredArtifact;
use crate::classifier::ErrorClassifier;
use crate::error::JobError;

use models::{
    AssetKind, ClassifiedError, HistoryItem, JobId, JobPhase, JobStatus, OperationRef,
};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Point-in-time view of a job.
#[derive(Debug, Clone)]
pub struct JobSnapshot {
    pub id: JobId,
    pub kind: AssetKind,
    pub status: JobStatus,
    pub phase: JobPhase,
    /// Status checks made so far (async kinds only).
    pub attempts: u32,
    /// Present only while the job is Submitting or Polling.
    pub operation: Option<OperationRef>,
    pub started_at: DateTime<Utc>,
    /// Every status entered after Idle, in order.
    pub transitions: Vec<JobStatus>,
    pub error: Option<ClassifiedError>,
}

/// A successfully generated asset.
#[derive(Debug, Clone)]
pub struct GeneratedAsset {
    pub job_id: JobId,
    pub kind: AssetKind,
    pub stored: StoredArtifact,
    pub history_item: HistoryItem,
    /// Generated text for text kinds.
    pub text: Option<String>,
}

/// How a job ended.
#[derive(Debug, Clone)]
pub enum JobOutcome {
    Succeeded(GeneratedAsset),
    Failed(ClassifiedError),
    TimedOut(ClassifiedError),
    Cancelled,
}

impl JobOutcome {
    pub fn status(&self) -> JobStatus {
        match self {
            JobOutcome::Succeeded(_) => JobStatus::Succeeded,
            JobOutcome::Failed(_) => JobStatus::Failed,
            JobOutcome::TimedOut(_) => JobStatus::TimedOut,
            JobOutcome::Cancelled => JobStatus::Cancelled,
        }
    }

    pub fn error(&self) -> Option<&ClassifiedError> {
        match self {
            JobOutcome::Failed(error) | JobOutcome::TimedOut(error) => Some(error),
            JobOutcome::Succeeded(_) | JobOutcome::Cancelled => None,
        }
    }
}

/// Shared, race-free job state.
///
/// Every mutation goes through `send_if_modified`, which holds the channel's
/// write lock for the duration of the closure. A cancel and a completion
/// therefore cannot both commit.
#[derive(Clone)]
pub(crate) struct JobTracker {
    state: Arc<watch::Sender<JobSnapshot>>,
    cancel: CancellationToken,
}

impl JobTracker {
    pub(crate) fn new(id: JobId, kind: AssetKind) -> Self {
        let snapshot = JobSnapshot {
            id,
            kind,
            status: JobStatus::Idle,
            phase: JobPhase::Idle,
            attempts: 0,
            operation: None,
            started_at: Utc::now(),
            transitions: Vec::new(),
            error: None,
        };

        Self {
            state: Arc::new(watch::Sender::new(snapshot)),
            cancel: CancellationToken::new(),
        }
    }

    pub(crate) fn snapshot(&self) -> JobSnapshot {
        self.state.borrow().clone()
    }

    pub(crate) fn status(&self) -> JobStatus {
        self.state.borrow().status
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<JobSnapshot> {
        self.state.subscribe()
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(crate) async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    /// Move to `next` if the edge is legal and the job was not cancelled.
    pub(crate) fn transition(&self, next: JobStatus, phase: JobPhase) -> bool {
        self.state.send_if_modified(|snapshot| {
            if self.cancel.is_cancelled() || !snapshot.status.can_transition_to(next) {
                return false;
            }
            apply(snapshot, next, phase);
            true
        })
    }

    /// Submitting -> Polling, recording the operation to re-check.
    pub(crate) fn start_polling(&self, operation: OperationRef) -> bool {
        self.state.send_if_modified(|snapshot| {
            if self.cancel.is_cancelled() || !snapshot.status.can_transition_to(JobStatus::Polling)
            {
                return false;
            }
            apply(snapshot, JobStatus::Polling, JobPhase::Polling);
            snapshot.operation = Some(operation);
            true
        })
    }

    /// Update the progress label without changing status.
    pub(crate) fn set_phase(&self, phase: JobPhase) {
        self.state.send_if_modified(|snapshot| {
            if snapshot.status.is_terminal() || snapshot.phase == phase {
                return false;
            }
            snapshot.phase = phase;
            true
        });
    }

    pub(crate) fn record_attempt(&self) -> u32 {
        let mut attempts = 0;
        self.state.send_modify(|snapshot| {
            snapshot.attempts += 1;
            attempts = snapshot.attempts;
        });
        attempts
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.state.borrow().attempts
    }

    /// Settle in `status` (Failed or TimedOut) unless the job already ended.
    ///
    /// Returns the status the job is in afterwards.
    pub(crate) fn settle(&self, status: JobStatus, error: Option<ClassifiedError>) -> JobStatus {
        let mut settled = status;
        self.state.send_if_modified(|snapshot| {
            let allowed = status == JobStatus::Cancelled || !self.cancel.is_cancelled();
            if !allowed || !snapshot.status.can_transition_to(status) {
                settled = snapshot.status;
                return false;
            }
            let phase = JobPhase::for_terminal(status).unwrap_or(snapshot.phase);
            apply(snapshot, status, phase);
            snapshot.error = error;
            true
        });
        settled
    }

    /// Caller-initiated cancel. Only legal while Submitting or Polling.
    pub(crate) fn cancel(&self) -> Result<(), JobError> {
        let mut current = JobStatus::Cancelled;
        let cancelled = self.state.send_if_modified(|snapshot| {
            current = snapshot.status;
            if !snapshot.status.is_cancellable() {
                return false;
            }
            self.cancel.cancel();
            apply(snapshot, JobStatus::Cancelled, JobPhase::Cancelled);
            true
        });

        if cancelled {
            Ok(())
        } else {
            Err(JobError::not_cancellable(current))
        }
    }
}

fn apply(snapshot: &mut JobSnapshot, next: JobStatus, phase: JobPhase) {
    snapshot.status = next;
    snapshot.phase = phase;
    snapshot.transitions.push(next);
    if !matches!(next, JobStatus::Submitting | JobStatus::Polling) {
        snapshot.operation = None;
    }
}

/// Caller's handle to a submitted job.
pub struct JobHandle {
    id: JobId,
    tracker: JobTracker,
    task: JoinHandle<JobOutcome>,
}

impl JobHandle {
    pub(crate) fn new(id: JobId, tracker: JobTracker, task: JoinHandle<JobOutcome>) -> Self {
        Self { id, tracker, task }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn status(&self) -> JobStatus {
        self.tracker.status()
    }

    pub fn snapshot(&self) -> JobSnapshot {
        self.tracker.snapshot()
    }

    /// Watch for status and phase changes.
    pub fn subscribe(&self) -> watch::Receiver<JobSnapshot> {
        self.tracker.subscribe()
    }

    /// Request cancellation. Fails once the job has reached a terminal state.
    pub fn cancel(&self) -> Result<(), JobError> {
        self.tracker.cancel()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the job to reach a terminal state.
    pub async fn wait(self) -> JobOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(join_error) => {
                error!("Job {} task ended abnormally: {join_error}", self.id);
                let classified = ErrorClassifier::classify(join_error);
                match self
                    .tracker
                    .settle(JobStatus::Failed, Some(classified.clone()))
                {
                    JobStatus::Cancelled => JobOutcome::Cancelled,
                    _ => JobOutcome::Failed(classified),
                }
            }
        }
    }
}

impl std::fmt::Debug for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobHandle")
            .field("id", &self.id)
            .field("status", &self.status())
            .finish()
    }
}
