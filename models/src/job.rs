use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

/// Identifier of one submitted job. Reused as the history item id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a job.
///
/// ```text
/// Idle -> Submitting -> Succeeded | Failed | Cancelled      (sync kinds)
///         Submitting -> Polling -> Succeeded | Failed | TimedOut | Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    Idle,
    Submitting,
    Polling,
    Succeeded,
    Failed,
    TimedOut,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::TimedOut | JobStatus::Cancelled
        )
    }

    pub fn is_cancellable(&self) -> bool {
        matches!(self, JobStatus::Submitting | JobStatus::Polling)
    }

    /// Whether `next` is a legal successor. Transitions never move backwards.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        use JobStatus::*;

        match (self, next) {
            (Idle, Submitting) => true,
            (Submitting, Polling | Succeeded | Failed | Cancelled) => true,
            (Polling, Succeeded | Failed | TimedOut | Cancelled) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Idle => "idle",
            JobStatus::Submitting => "submitting",
            JobStatus::Polling => "polling",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed => "failed",
            JobStatus::TimedOut => "timed out",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finer-grained progress step, rendered to the user as a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobPhase {
    Idle,
    Submitting,
    AwaitingResult,
    Polling,
    Downloading,
    Saving,
    Completed,
    Failed,
    TimedOut,
    Cancelled,
}

impl JobPhase {
    pub fn label(&self) -> &'static str {
        match self {
            JobPhase::Idle => "idle",
            JobPhase::Submitting => "submitting request",
            JobPhase::AwaitingResult => "waiting for result",
            JobPhase::Polling => "waiting for remote processing",
            JobPhase::Downloading => "downloading result",
            JobPhase::Saving => "saving result",
            JobPhase::Completed => "done",
            JobPhase::Failed => "failed",
            JobPhase::TimedOut => "timed out",
            JobPhase::Cancelled => "cancelled",
        }
    }

    /// Phase shown once a job settles in `status`.
    pub fn for_terminal(status: JobStatus) -> Option<JobPhase> {
        match status {
            JobStatus::Succeeded => Some(JobPhase::Completed),
            JobStatus::Failed => Some(JobPhase::Failed),
            JobStatus::TimedOut => Some(JobPhase::TimedOut),
            JobStatus::Cancelled => Some(JobPhase::Cancelled),
            JobStatus::Idle | JobStatus::Submitting | JobStatus::Polling => None,
        }
    }
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Opaque name of a long-running remote operation, used to re-poll it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationRef(String);

impl OperationRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a finished remote operation left its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteArtifactRef {
    pub uri: String,
    pub mime_type: Option<String>,
}

impl RemoteArtifactRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}
