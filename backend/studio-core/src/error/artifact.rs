use std::panic::Location;
use std::path::PathBuf;

use common::ErrorLocation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact Write Error: {path}: {source} {location}")]
    Write {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Artifact Remove Error: {path}: {source} {location}")]
    Remove {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ArtifactError {
    #[track_caller]
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ArtifactError::Write {
            location: ErrorLocation::from(Location::caller()),
            path: path.into(),
            source,
        }
    }

    #[track_caller]
    pub fn remove(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ArtifactError::Remove {
            location: ErrorLocation::from(Location::caller()),
            path: path.into(),
            source,
        }
    }
}
