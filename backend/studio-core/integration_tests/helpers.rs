//! Test helpers for orchestrator and studio integration tests.
//!
//! - [`FakeRemoteClient`]: a scripted [`RemoteJobClient`] that counts calls
//! - [`harness`]: an orchestrator wired to temp-dir storage

use studio_core::artifact::ArtifactStore;
use studio_core::error::RemoteError;
use studio_core::history::HistoryStore;
use studio_core::orchestrator::{JobOrchestrator, PollConfig};
use studio_core::remote::{Artifact, PollStatus, RemoteJobClient};

use models::{GenerationRequest, OperationRef, ReferenceImage, RemoteArtifactRef};

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

pub const TEST_OPERATION: &str = "models/veo/operations/test-op";
pub const TEST_VIDEO_BYTES: &[u8] = b"\x00\x00\x00\x18ftypmp42";

/// Scripted remote client.
///
/// Unscripted calls succeed: sync calls return a small PNG, submit returns
/// [`TEST_OPERATION`], polls stay pending forever, fetch returns
/// [`TEST_VIDEO_BYTES`].
#[derive(Default)]
pub struct FakeRemoteClient {
    sync_outcomes: Mutex<VecDeque<Result<Artifact, RemoteError>>>,
    submit_outcome: Mutex<Option<Result<OperationRef, RemoteError>>>,
    polls: Mutex<VecDeque<Result<PollStatus, RemoteError>>>,
    fetch_outcome: Mutex<Option<Result<Vec<u8>, RemoteError>>>,
    call_delay: Option<Duration>,
    fetch_delay: Option<Duration>,
    generate_calls: AtomicU32,
    submit_calls: AtomicU32,
    poll_calls: AtomicU32,
    fetch_calls: AtomicU32,
}

impl FakeRemoteClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sync(self, outcome: Result<Artifact, RemoteError>) -> Self {
        self.sync_outcomes.lock().unwrap().push_back(outcome);
        self
    }

    pub fn with_submit(self, outcome: Result<OperationRef, RemoteError>) -> Self {
        *self.submit_outcome.lock().unwrap() = Some(outcome);
        self
    }

    /// `pending` not-done answers followed by a completed one.
    pub fn with_pending_then_done(self, pending: usize) -> Self {
        {
            let mut polls = self.polls.lock().unwrap();
            for _ in 0..pending {
                polls.push_back(Ok(PollStatus::Pending));
            }
            polls.push_back(Ok(PollStatus::Completed(
                RemoteArtifactRef::new("https://files.test/video.mp4").with_mime_type("video/mp4"),
            )));
        }
        self
    }

    pub fn with_poll(self, outcome: Result<PollStatus, RemoteError>) -> Self {
        self.polls.lock().unwrap().push_back(outcome);
        self
    }

    pub fn with_fetch(self, outcome: Result<Vec<u8>, RemoteError>) -> Self {
        *self.fetch_outcome.lock().unwrap() = Some(outcome);
        self
    }

    /// Delay applied to `generate_sync` and `submit_async`.
    pub fn with_call_delay(mut self, delay: Duration) -> Self {
        self.call_delay = Some(delay);
        self
    }

    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    pub fn generate_calls(&self) -> u32 {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn submit_calls(&self) -> u32 {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn poll_calls(&self) -> u32 {
        self.poll_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> u32 {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn remote_calls(&self) -> u32 {
        self.generate_calls() + self.submit_calls() + self.poll_calls() + self.fetch_calls()
    }

    async fn delay(&self, delay: Option<Duration>) {
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl RemoteJobClient for FakeRemoteClient {
    async fn generate_sync(&self, request: &GenerationRequest) -> Result<Artifact, RemoteError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.delay(self.call_delay).await;

        let scripted = self.sync_outcomes.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(default_artifact(request)))
    }

    async fn submit_async(
        &self,
        _request: &GenerationRequest,
    ) -> Result<OperationRef, RemoteError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.delay(self.call_delay).await;

        let scripted = self.submit_outcome.lock().unwrap().take();
        scripted.unwrap_or_else(|| Ok(OperationRef::new(TEST_OPERATION)))
    }

    async fn poll_async(&self, _operation: &OperationRef) -> Result<PollStatus, RemoteError> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);

        let scripted = self.polls.lock().unwrap().pop_front();
        scripted.unwrap_or(Ok(PollStatus::Pending))
    }

    async fn fetch_artifact(&self, _artifact: &RemoteArtifactRef) -> Result<Vec<u8>, RemoteError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.delay(self.fetch_delay).await;

        let scripted = self.fetch_outcome.lock().unwrap().take();
        scripted.unwrap_or_else(|| Ok(TEST_VIDEO_BYTES.to_vec()))
    }
}

fn default_artifact(request: &GenerationRequest) -> Artifact {
    match request.kind().output() {
        models::OutputKind::Text => Artifact::Text(format!("Generated for: {}", request.prompt())),
        _ => Artifact::Image {
            bytes: vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A],
            mime_type: "image/png".to_string(),
        },
    }
}

pub fn reference_image() -> ReferenceImage {
    ReferenceImage::new(vec![0x89, b'P', b'N', b'G'], "image/png")
}

pub fn intro_request() -> GenerationRequest {
    GenerationRequest::intro("Fox Studio", Some(reference_image()))
}

/// 10 s fixed interval, 600 s budget, no attempt cap.
pub fn default_poll() -> PollConfig {
    PollConfig::default()
}

pub struct Harness {
    pub dir: TempDir,
    pub client: Arc<FakeRemoteClient>,
    pub history: HistoryStore,
    pub orchestrator: JobOrchestrator,
}

impl Harness {
    pub fn artifact_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("artifacts")
    }

    /// Number of files in the artifact directory.
    pub fn stored_files(&self) -> usize {
        count_files(&self.artifact_dir())
    }
}

pub async fn harness(client: FakeRemoteClient, poll: PollConfig) -> Harness {
    harness_with_capacity(client, poll, 50).await
}

pub async fn harness_with_capacity(
    client: FakeRemoteClient,
    poll: PollConfig,
    capacity: usize,
) -> Harness {
    let dir = TempDir::new().expect("temp dir");
    let client = Arc::new(client);
    let artifacts = ArtifactStore::new(dir.path().join("artifacts"));
    let history = HistoryStore::open_with_artifacts(dir.path(), capacity, artifacts.clone())
        .await
        .expect("history opens");
    let orchestrator = JobOrchestrator::new(
        client.clone() as Arc<dyn RemoteJobClient>,
        artifacts,
        history.clone(),
        poll,
    );

    Harness {
        dir,
        client,
        history,
        orchestrator,
    }
}

pub fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| entries.filter_map(Result::ok).count())
        .unwrap_or(0)
}
