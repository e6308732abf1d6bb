pub mod artifact;
pub mod auth;
pub mod config;
pub mod history;
pub mod job;
pub mod remote;

pub use artifact::ArtifactError;
pub use auth::{AuthError, KeyValidationFailure};
pub use config::ConfigError;
pub use history::HistoryError;
pub use job::{JobError, JobTimeout};
pub use remote::RemoteError;

use models::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Job(#[from] JobError),

    #[error(transparent)]
    Model(#[from] ModelError),
}
