//! Job lifecycle: submission, polling, cancellation and completion.
//!
//! [`JobOrchestrator::submit`] validates the request synchronously and then
//! runs the job on its own tokio task. The caller keeps a [`JobHandle`] to
//! watch progress, cancel, or wait for the [`JobOutcome`].

pub(crate) mod handle;
mod poll;
mod run;

pub use handle::{GeneratedAsset, JobHandle, JobOutcome, JobSnapshot};
pub use poll::{PollConfig, PollSchedule};

use crate::artifact::ArtifactStore;
use crate::classifier::ErrorClassifier;
use crate::error::JobError;
use crate::history::HistoryStore;
use crate::remote::RemoteJobClient;

use handle::JobTracker;
use run::JobRun;

use models::{ClassifiedError, GenerationRequest, JobId, JobPhase, JobStatus};

use std::sync::Arc;

use log::{debug, info};
use tokio::time::Instant;

#[derive(Clone)]
pub struct JobOrchestrator {
    client: Arc<dyn RemoteJobClient>,
    artifacts: ArtifactStore,
    history: HistoryStore,
    poll: PollConfig,
}

impl JobOrchestrator {
    pub fn new(
        client: Arc<dyn RemoteJobClient>,
        artifacts: ArtifactStore,
        history: HistoryStore,
        poll: PollConfig,
    ) -> Self {
        Self {
            client,
            artifacts,
            history,
            poll,
        }
    }

    /// Validate `request` and start it.
    ///
    /// Invalid requests are rejected here with an `InvalidInput`
    /// classification and never reach the remote service. Must be called
    /// inside a tokio runtime.
    pub fn submit(&self, request: GenerationRequest) -> Result<JobHandle, ClassifiedError> {
        if let Err(e) = request.validate() {
            debug!("Rejected {} request: {}", request.kind(), e.message());
            return Err(ErrorClassifier::classify(e));
        }

        let id = JobId::new();
        let tracker = JobTracker::new(id, request.kind());
        tracker.transition(JobStatus::Submitting, JobPhase::Submitting);
        info!("Job {id} submitted ({})", request.kind());

        let run = JobRun {
            id,
            request,
            tracker: tracker.clone(),
            client: Arc::clone(&self.client),
            artifacts: self.artifacts.clone(),
            history: self.history.clone(),
            poll: self.poll.clone(),
            submitted_at: Instant::now(),
        };
        let task = tokio::spawn(run.execute());

        Ok(JobHandle::new(id, tracker, task))
    }

    /// Cancel a running job. Errors once the job is terminal.
    pub fn cancel(&self, handle: &JobHandle) -> Result<(), JobError> {
        handle.cancel()?;
        info!("Job {} cancellation requested", handle.id());
        Ok(())
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn poll_config(&self) -> &PollConfig {
        &self.poll
    }
}
