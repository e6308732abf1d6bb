//! Boundary to the remote generation service.
//!
//! The orchestrator only ever talks to [`RemoteJobClient`]; [`GeminiClient`]
//! is the production implementation and tests substitute their own.

pub mod gemini;

pub use gemini::{GeminiClient, GeminiModels};

use crate::error::RemoteError;

use models::{GenerationRequest, OperationRef, RemoteArtifactRef};

use std::fmt;

use async_trait::async_trait;

pub const DEFAULT_IMAGE_MIME: &str = "image/png";
pub const DEFAULT_VIDEO_MIME: &str = "video/mp4";
pub const TEXT_MIME: &str = "text/plain";

/// Output of a finished generation, held in memory until stored.
#[derive(Clone, PartialEq, Eq)]
pub enum Artifact {
    Image { bytes: Vec<u8>, mime_type: String },
    Text(String),
    Video { bytes: Vec<u8>, mime_type: String },
}

impl Artifact {
    pub fn bytes(&self) -> &[u8] {
        match self {
            Artifact::Image { bytes, .. } | Artifact::Video { bytes, .. } => bytes,
            Artifact::Text(text) => text.as_bytes(),
        }
    }

    pub fn mime_type(&self) -> &str {
        match self {
            Artifact::Image { mime_type, .. } | Artifact::Video { mime_type, .. } => mime_type,
            Artifact::Text(_) => TEXT_MIME,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Artifact::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::Image { bytes, mime_type } => f
                .debug_struct("Image")
                .field("len", &bytes.len())
                .field("mime_type", mime_type)
                .finish(),
            Artifact::Text(text) => f.debug_struct("Text").field("len", &text.len()).finish(),
            Artifact::Video { bytes, mime_type } => f
                .debug_struct("Video")
                .field("len", &bytes.len())
                .field("mime_type", mime_type)
                .finish(),
        }
    }
}

/// Answer to one status check of a long-running operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStatus {
    Pending,
    Completed(RemoteArtifactRef),
    Failed { message: String },
}

/// Operations the orchestrator needs from a generation backend.
///
/// Sync kinds go through [`generate_sync`](Self::generate_sync); the video
/// kind goes through submit, poll and fetch.
#[async_trait]
pub trait RemoteJobClient: Send + Sync {
    async fn generate_sync(&self, request: &GenerationRequest) -> Result<Artifact, RemoteError>;

    async fn submit_async(&self, request: &GenerationRequest)
    -> Result<OperationRef, RemoteError>;

    async fn poll_async(&self, operation: &OperationRef) -> Result<PollStatus, RemoteError>;

    async fn fetch_artifact(&self, artifact: &RemoteArtifactRef) -> Result<Vec<u8>, RemoteError>;
}
