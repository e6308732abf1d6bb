//! Caller-facing entry point tying the pieces together.

use crate::artifact::ArtifactStore;
use crate::config::StudioConfig;
use crate::error::{CoreError, HistoryError, JobError};
use crate::history::HistoryStore;
use crate::orchestrator::{JobHandle, JobOrchestrator};
use crate::remote::RemoteJobClient;

use models::{ClassifiedError, GenerationRequest, HistoryItem};

use std::path::Path;
use std::sync::Arc;

use log::info;

#[derive(Clone)]
pub struct Studio {
    orchestrator: JobOrchestrator,
    history: HistoryStore,
}

impl Studio {
    pub fn new(orchestrator: JobOrchestrator) -> Self {
        let history = orchestrator.history().clone();
        Self {
            orchestrator,
            history,
        }
    }

    /// Open history and artifact storage under `data_dir` and wire them to `client`.
    pub async fn open(
        config: &StudioConfig,
        data_dir: &Path,
        client: Arc<dyn RemoteJobClient>,
    ) -> Result<Self, CoreError> {
        config.validate()?;

        let artifacts = ArtifactStore::new(StudioConfig::artifact_dir(data_dir));
        let history =
            HistoryStore::open_with_artifacts(data_dir, config.history.capacity, artifacts.clone())
                .await?;
        let orchestrator = JobOrchestrator::new(
            client,
            artifacts,
            history,
            config.polling.to_poll_config(),
        );

        info!("Studio ready (data dir {})", data_dir.display());
        Ok(Self::new(orchestrator))
    }

    pub fn submit_request(&self, request: GenerationRequest) -> Result<JobHandle, ClassifiedError> {
        self.orchestrator.submit(request)
    }

    pub fn cancel_request(&self, handle: &JobHandle) -> Result<(), JobError> {
        self.orchestrator.cancel(handle)
    }

    /// History, newest first.
    pub async fn get_history(&self) -> Vec<HistoryItem> {
        self.history.list().await
    }

    pub async fn clear_history(&self) -> Result<(), HistoryError> {
        self.history.clear().await
    }

    pub fn orchestrator(&self) -> &JobOrchestrator {
        &self.orchestrator
    }
}
