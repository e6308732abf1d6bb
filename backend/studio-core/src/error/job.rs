use common::ErrorLocation;
use models::JobStatus;

use std::panic::Location;
use std::time::Duration;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum JobError {
    #[error("Job is already {status} and can no longer be cancelled {location}")]
    NotCancellable {
        status: JobStatus,
        location: ErrorLocation,
    },
}

impl JobError {
    #[track_caller]
    pub fn not_cancellable(status: JobStatus) -> Self {
        JobError::NotCancellable {
            status,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Raised when a job runs past its wait budget.
#[derive(Debug, ThisError)]
#[error("Job exceeded its wait budget after {waited:?} and {attempts} status checks {location}")]
pub struct JobTimeout {
    pub waited: Duration,
    pub attempts: u32,
    pub location: ErrorLocation,
}

impl JobTimeout {
    #[track_caller]
    pub fn new(waited: Duration, attempts: u32) -> Self {
        Self {
            waited,
            attempts,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
