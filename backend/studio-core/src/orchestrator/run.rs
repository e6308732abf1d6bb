use super::handle::{GeneratedAsset, JobOutcome, JobTracker};
use super::poll::{PollConfig, PollSchedule};
use crate::artifact::{ArtifactStore, StoredArtifact};
use crate::classifier::ErrorClassifier;
use crate::error::{JobTimeout, RemoteError};
use crate::history::HistoryStore;
use crate::remote::{Artifact, DEFAULT_VIDEO_MIME, PollStatus, RemoteJobClient};

use models::{
    ClassifiedError, GenerationRequest, HistoryItemBuilder, JobId, JobPhase, JobStatus,
    OperationRef, RemoteArtifactRef,
};

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, trace, warn};
use tokio::time::{Instant, sleep_until};

/// Why a job stopped before producing an artifact.
enum Halt {
    Cancelled,
    Failed(ClassifiedError),
    TimedOut(ClassifiedError),
}

/// Drives one job from Submitting to a terminal state. Owned by its task.
pub(crate) struct JobRun {
    pub(crate) id: JobId,
    pub(crate) request: GenerationRequest,
    pub(crate) tracker: JobTracker,
    pub(crate) client: Arc<dyn RemoteJobClient>,
    pub(crate) artifacts: ArtifactStore,
    pub(crate) history: HistoryStore,
    pub(crate) poll: PollConfig,
    pub(crate) submitted_at: Instant,
}

impl JobRun {
    fn deadline(&self) -> Instant {
        self.submitted_at + self.poll.max_wait
    }

    pub(crate) async fn execute(self) -> JobOutcome {
        let kind = self.request.kind();
        debug!("Job {} ({kind}) started", self.id);

        let produced = if kind.is_async() {
            self.run_async().await
        } else {
            self.run_sync().await
        };

        match produced {
            Ok(artifact) => self.complete(artifact).await,
            Err(halt) => self.halt(halt),
        }
    }

    async fn run_sync(&self) -> Result<Artifact, Halt> {
        self.tracker.set_phase(JobPhase::AwaitingResult);

        self.race(self.client.generate_sync(&self.request))
            .await?
            .map_err(|e| Halt::Failed(ErrorClassifier::classify(e)))
    }

    async fn run_async(&self) -> Result<Artifact, Halt> {
        let operation = self
            .race(self.client.submit_async(&self.request))
            .await?
            .map_err(|e| Halt::Failed(ErrorClassifier::classify(e)))?;

        if !self.tracker.start_polling(operation.clone()) {
            return Err(Halt::Cancelled);
        }
        info!("Job {} polling operation {operation}", self.id);

        let remote = self.poll_until_done(&operation).await?;
        self.download(remote).await
    }

    async fn poll_until_done(&self, operation: &OperationRef) -> Result<RemoteArtifactRef, Halt> {
        let mut schedule = PollSchedule::new(&self.poll);

        loop {
            if self.tracker.is_cancelled() {
                return Err(Halt::Cancelled);
            }
            if self.budget_exhausted() {
                return Err(self.timed_out());
            }

            let attempt = self.tracker.record_attempt();
            let status = self
                .race(self.client.poll_async(operation))
                .await?
                .map_err(|e| Halt::Failed(ErrorClassifier::classify(e)))?;

            match status {
                PollStatus::Completed(remote) => {
                    debug!("Job {} operation done after {attempt} check(s)", self.id);
                    return Ok(remote);
                }
                PollStatus::Failed { message } => {
                    let error = RemoteError::operation(message);
                    return Err(Halt::Failed(ErrorClassifier::classify(error)));
                }
                PollStatus::Pending => trace!("Job {} still pending (check {attempt})", self.id),
            }

            if self.attempts_spent() {
                return Err(self.timed_out());
            }

            let wake_at = (Instant::now() + schedule.next_delay()).min(self.deadline());
            tokio::select! {
                biased;
                _ = self.tracker.cancelled() => return Err(Halt::Cancelled),
                _ = sleep_until(wake_at) => {}
            }
        }
    }

    /// Downloads are not raced against cancellation; the bytes are dropped
    /// afterwards instead.
    async fn download(&self, remote: RemoteArtifactRef) -> Result<Artifact, Halt> {
        self.tracker.set_phase(JobPhase::Downloading);

        let bytes = self
            .client
            .fetch_artifact(&remote)
            .await
            .map_err(|e| Halt::Failed(ErrorClassifier::classify(e)))?;

        if self.tracker.is_cancelled() {
            debug!("Job {} cancelled during download, discarding result", self.id);
            return Err(Halt::Cancelled);
        }

        Ok(Artifact::Video {
            bytes,
            mime_type: remote
                .mime_type
                .unwrap_or_else(|| DEFAULT_VIDEO_MIME.to_string()),
        })
    }

    async fn complete(&self, artifact: Artifact) -> JobOutcome {
        let kind = self.request.kind();
        self.tracker.set_phase(JobPhase::Saving);

        let stored = match self.artifacts.store(self.id, kind, &artifact).await {
            Ok(stored) => stored,
            Err(e) => return self.halt(Halt::Failed(ErrorClassifier::classify(e))),
        };

        let history_item = match HistoryItemBuilder::default()
            .with_id(self.id.to_string())
            .with_kind(kind)
            .with_artifact_ref(stored.reference())
            .with_prompt(self.request.history_label())
            .with_created_at(Utc::now())
            .build()
        {
            Ok(item) => item,
            Err(e) => {
                self.release(&stored).await;
                return self.halt(Halt::Failed(ErrorClassifier::classify(e)));
            }
        };

        if !self.tracker.transition(JobStatus::Succeeded, JobPhase::Completed) {
            self.release(&stored).await;
            return self.halt(Halt::Cancelled);
        }
        info!("Job {} ({kind}) succeeded", self.id);

        if let Err(e) = self.history.append(history_item.clone()).await {
            warn!("Job {} succeeded but was not added to history: {e}", self.id);
        }

        JobOutcome::Succeeded(GeneratedAsset {
            job_id: self.id,
            kind,
            stored,
            history_item,
            text: artifact.text().map(str::to_string),
        })
    }

    async fn release(&self, stored: &StoredArtifact) {
        if let Err(e) = self.artifacts.release(stored).await {
            warn!("Job {} could not release {}: {e}", self.id, stored.path().display());
        }
    }

    fn halt(&self, halt: Halt) -> JobOutcome {
        let (target, error) = match halt {
            Halt::Cancelled => (JobStatus::Cancelled, None),
            Halt::Failed(error) => (JobStatus::Failed, Some(error)),
            Halt::TimedOut(error) => (JobStatus::TimedOut, Some(error)),
        };

        match self.tracker.settle(target, error.clone()) {
            JobStatus::Failed | JobStatus::TimedOut => {
                let error = error.unwrap_or_else(|| ErrorClassifier::classify("job failed"));
                warn!(
                    "Job {} ended as {}: [{}] {}",
                    self.id,
                    target,
                    error.kind(),
                    describe_cause(&error)
                );
                if target == JobStatus::TimedOut {
                    JobOutcome::TimedOut(error)
                } else {
                    JobOutcome::Failed(error)
                }
            }
            _ => {
                info!("Job {} cancelled", self.id);
                JobOutcome::Cancelled
            }
        }
    }

    /// Race `call` against cancellation and the job deadline.
    async fn race<F, T>(&self, call: F) -> Result<T, Halt>
    where
        F: Future<Output = T>,
    {
        tokio::select! {
            biased;
            _ = self.tracker.cancelled() => Err(Halt::Cancelled),
            _ = sleep_until(self.deadline()) => Err(self.timed_out()),
            output = call => Ok(output),
        }
    }

    fn attempts_spent(&self) -> bool {
        self.poll
            .max_attempts
            .is_some_and(|max| self.tracker.attempts() >= max)
    }

    fn budget_exhausted(&self) -> bool {
        self.attempts_spent() || Instant::now() >= self.deadline()
    }

    /// Sync jobs have no TimedOut state; they fail with a Timeout classification.
    fn timed_out(&self) -> Halt {
        let waited = Instant::now().saturating_duration_since(self.submitted_at);
        let error = ErrorClassifier::classify(JobTimeout::new(waited, self.tracker.attempts()));

        if self.tracker.status() == JobStatus::Polling {
            Halt::TimedOut(error)
        } else {
            Halt::Failed(error)
        }
    }
}

fn describe_cause(error: &ClassifiedError) -> String {
    match error.cause() {
        Some(cause) => cause.to_string(),
        None => error.message().to_string(),
    }
}
