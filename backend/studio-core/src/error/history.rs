use std::panic::Location;
use std::path::PathBuf;

use common::ErrorLocation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("History Read Error: {path}: {source} {location}")]
    Read {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("History Parse Error: {path}: {reason} {location}")]
    Parse {
        location: ErrorLocation,
        path: PathBuf,
        reason: String,
    },

    #[error("History Write Error: {path}: {source} {location}")]
    Write {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("History Serialization Error: {reason} {location}")]
    Serialize {
        location: ErrorLocation,
        reason: String,
    },

    #[error("History store is no longer running {location}")]
    Closed { location: ErrorLocation },
}

impl HistoryError {
    #[track_caller]
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HistoryError::Read {
            location: ErrorLocation::from(Location::caller()),
            path: path.into(),
            source,
        }
    }

    #[track_caller]
    pub fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        HistoryError::Parse {
            location: ErrorLocation::from(Location::caller()),
            path: path.into(),
            reason: reason.into(),
        }
    }

    #[track_caller]
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HistoryError::Write {
            location: ErrorLocation::from(Location::caller()),
            path: path.into(),
            source,
        }
    }

    #[track_caller]
    pub fn serialize(reason: impl Into<String>) -> Self {
        HistoryError::Serialize {
            location: ErrorLocation::from(Location::caller()),
            reason: reason.into(),
        }
    }

    #[track_caller]
    pub fn closed() -> Self {
        HistoryError::Closed {
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
